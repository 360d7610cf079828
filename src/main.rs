use pacer::error::AppResult;

fn main() -> AppResult<()> {
    pacer::entry::run()
}
