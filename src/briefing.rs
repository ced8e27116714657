//! The two agents and the prompt this program runs

use std::sync::Arc;

use anyhow::Result;

use crate::agent::{Agent, RunConfig, RunResult, Runner};
use crate::config::Settings;
use crate::core::FrameworkResult;
use crate::llm::{GeminiProvider, LlmProvider};
use crate::tools::common::default_client;
use crate::tools::{BreakingNewsTool, LocationTool};

pub const PLANT_AGENT_NAME: &str = "PlantAgent";
pub const NEWS_LOCATION_AGENT_NAME: &str = "NewsLocationAgent";

const PLANT_INSTRUCTIONS: &str =
    "You are a plant biology expert who can explain photosynthesis clearly.";

const NEWS_LOCATION_INSTRUCTIONS: &str = "You specialize in giving the user's current location \
     and the latest breaking news, and can also answer questions about plant biology briefly.";

/// The scripted input. The questions are numbered 1, 3, 2 on purpose: that is
/// the prompt as it has always been sent.
pub const BRIEFING_PROMPT: &str = concat!(
    " \n",
    "            1. What is my current location?\n",
    "            3. Any breaking news?\n",
    "            2. What is photosynthesis\n",
    "        ",
);

/// Specialist with no tools
pub fn plant_agent() -> Agent {
    Agent::new(PLANT_AGENT_NAME, PLANT_INSTRUCTIONS)
}

/// Generalist with both fetch tools and a handoff to `plant`
pub fn news_location_agent(plant: Arc<Agent>) -> Result<Agent> {
    let client = default_client()?;
    Ok(Agent::new(NEWS_LOCATION_AGENT_NAME, NEWS_LOCATION_INSTRUCTIONS)
        .with_tool(LocationTool::new(client.clone()))
        .with_tool(BreakingNewsTool::new(client))
        .with_handoff(plant))
}

/// Build both agents and return the one a run starts from
pub fn starting_agent() -> Result<Arc<Agent>> {
    let plant = Arc::new(plant_agent());
    Ok(Arc::new(news_location_agent(plant)?))
}

/// Load settings, wire the Gemini provider and both agents, and run the
/// briefing prompt once.
///
/// Settings are loaded first, so a missing `GEMINI_API_KEY` fails before any
/// client is built or request sent.
pub async fn run<L>(load_settings: L) -> Result<RunResult>
where
    L: FnOnce() -> FrameworkResult<Settings>,
{
    let settings = load_settings()?;
    tracing::debug!("Settings: {:?}", settings);

    let llm: Arc<dyn LlmProvider> = Arc::new(GeminiProvider::from_settings(&settings));
    let config = RunConfig::from_settings(llm, &settings);
    let agent = starting_agent()?;

    Ok(Runner::run(&agent, BRIEFING_PROMPT, &config).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_graph() {
        let agent = starting_agent().unwrap();
        assert_eq!(agent.name(), "NewsLocationAgent");

        let names: Vec<_> = agent.tool_definitions().into_iter().map(|d| d.name).collect();
        assert_eq!(
            names,
            vec!["get_current_location", "get_breaking_news", "transfer_to_plantagent"]
        );

        let plant = agent.handoffs()[0].target();
        assert_eq!(plant.name(), "PlantAgent");
        assert!(plant.tools().is_empty());
        assert!(plant.handoffs().is_empty());
    }

    #[tokio::test]
    async fn test_briefing_run_ends_with_specialist() {
        use crate::agent::{RunConfig, Runner};
        use crate::testing::{text_response, tool_call_response, ScriptedProvider};

        let provider = Arc::new(ScriptedProvider::new(vec![
            tool_call_response(&[("h1", "transfer_to_plantagent")]),
            text_response("Photosynthesis turns light, water and CO2 into sugar."),
        ]));
        let config = RunConfig::new(provider.clone());
        let agent = starting_agent().unwrap();

        let result = Runner::run(&agent, BRIEFING_PROMPT, &config).await.unwrap();

        assert_eq!(result.last_agent.name(), PLANT_AGENT_NAME);
        assert!(!result.final_output.is_empty());

        let requests = provider.requests();
        assert_eq!(requests[0].system.as_deref(), Some(NEWS_LOCATION_INSTRUCTIONS));
        assert_eq!(requests[1].system.as_deref(), Some(PLANT_INSTRUCTIONS));
        assert!(requests[1].tool_names.is_empty());
    }

    fn settings_for(base: Option<&str>, key: Option<&str>) -> FrameworkResult<Settings> {
        let base = base.map(str::to_string);
        let key = key.map(str::to_string);
        Settings::from_lookup(move |name| match name {
            "GEMINI_API_KEY" => key.clone(),
            "GEMINI_API_BASE" => base.clone(),
            _ => None,
        })
    }

    #[tokio::test]
    async fn test_run_without_key_sends_nothing() {
        use crate::core::FrameworkError;
        use crate::testing::StubServer;

        let server = StubServer::start(200, "{}").await;
        let base = server.base_url().to_string();

        let err = run(|| settings_for(Some(&base), None)).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<FrameworkError>(),
            Some(FrameworkError::MissingCredential(k)) if k == "GEMINI_API_KEY"
        ));
        assert!(server.requests().is_empty());
    }

    #[tokio::test]
    async fn test_run_against_gemini_stub() {
        use crate::testing::StubServer;

        let body = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"You are in Lahore."}]},"finishReason":"STOP"}]}"#;
        let server = StubServer::start(200, body).await;
        let base = server.base_url().to_string();

        let result = run(|| settings_for(Some(&base), Some("AIza-test"))).await.unwrap();

        assert_eq!(result.final_output, "You are in Lahore.");
        assert_eq!(result.last_agent.name(), NEWS_LOCATION_AGENT_NAME);

        let request = server.single_request();
        assert_eq!(request.uri, "/models/gemini-2.0-flash:generateContent");
        assert_eq!(request.header("x-goog-api-key"), Some("AIza-test"));
        let sent: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
        assert_eq!(sent["contents"][0]["parts"][0]["text"], BRIEFING_PROMPT);
    }

    #[test]
    fn test_prompt_keeps_question_order() {
        let questions: Vec<_> = BRIEFING_PROMPT
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        assert_eq!(
            questions,
            vec![
                "1. What is my current location?",
                "3. Any breaking news?",
                "2. What is photosynthesis"
            ]
        );
    }
}
