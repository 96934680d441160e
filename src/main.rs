fn main() -> anyhow::Result<()> {
    ai_history_extractor::cli::run()
}
