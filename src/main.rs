use briefing_agent::briefing;
use briefing_agent::cli::Report;
use briefing_agent::config::Settings;
use briefing_agent::logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; real environment variables still apply
    let _ = dotenvy::dotenv();

    let _log_guard = logging::init_logging()?;

    let result = briefing::run(Settings::from_env).await?;

    tracing::info!(
        "Run finished: {} items, {} input / {} output tokens",
        result.new_items.len(),
        result.usage.input_tokens,
        result.usage.output_tokens
    );

    Report::new().print(&result)?;

    Ok(())
}
