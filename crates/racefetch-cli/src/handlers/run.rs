//! Run command handler

use crate::cli::RunArgs;
use crate::config::{RaceFile, RaceOverrides};
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::{OutputFormatter, OutputWriter};
use racefetch_core::RaceCoordinator;
use std::fs;
use tracing::{debug, info, instrument};

/// Handle the run command
#[instrument(skip(args, output), fields(file = ?args.file))]
pub async fn handle_run(args: RunArgs, output: &mut OutputWriter) -> Result<()> {
    let timer = Timer::new("run_command");

    let race_file = RaceFile::load(args.file.as_deref())?;
    let options = race_file.race_options(&RaceOverrides {
        timeout_per_attempt_ms: args.timeout_per_attempt,
        no_fallback: args.no_fallback,
        reject_error_status: args.reject_error_status,
    });
    info!(
        path = %race_file.path.display(),
        providers = race_file.providers.len(),
        "Loaded providers file"
    );
    debug!(options = ?options, "Race options");

    let coordinator = RaceCoordinator::new(race_file.providers, options)?;
    let response = coordinator.run().await?;
    info!(
        provider = %response.provider,
        status = response.response_status,
        elapsed_ms = timer.elapsed().as_millis() as u64,
        "Race finished"
    );

    match args.save_to {
        Some(path) => {
            let content = output.format().format_response(&response)?;
            fs::write(&path, content)?;
            output.success(&format!("Response saved to {}", path.display()))?;
        }
        None => {
            output.section("Response")?;
            output.response(&response)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::error::Error;
    use crate::output::tests::SharedBuffer;
    use serde_json::json;
    use std::io::Write;
    use std::path::{Path, PathBuf};
    use tempfile::NamedTempFile;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn providers_file(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn run_args(file: &Path) -> RunArgs {
        RunArgs {
            file: Some(file.to_path_buf()),
            timeout_per_attempt: None,
            no_fallback: false,
            reject_error_status: false,
            save_to: None,
        }
    }

    #[tokio::test]
    async fn test_run_prints_winner() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rates"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "a": 1 }))
                    .insert_header("x-id", "7"),
            )
            .mount(&server)
            .await;

        let file = providers_file(&format!(
            r#"
providers:
  - name: down
    method: GET
    baseUrl: http://127.0.0.1:9
    pathname: /rates
    responseType: application/json
  - name: p1
    method: GET
    baseUrl: {}
    pathname: /rates
    responseType: application/json
"#,
            server.uri()
        ));

        let buffer = SharedBuffer::default();
        let mut output =
            OutputWriter::with_writer(OutputFormat::Json, false, false, Box::new(buffer.clone()));
        handle_run(run_args(file.path()), &mut output).await.unwrap();

        let printed: serde_json::Value = serde_json::from_str(buffer.contents().trim()).unwrap();
        assert_eq!(printed["provider"], "p1");
        assert_eq!(printed["payload"], json!({ "a": 1 }));
        assert_eq!(printed["responseStatus"], 200);
        assert_eq!(printed["responseHeaders"]["x-id"], "7");
    }

    #[tokio::test]
    async fn test_run_no_fallback_fails() {
        let file = providers_file(
            r#"
providers:
  - name: down
    method: GET
    baseUrl: http://127.0.0.1:9
    pathname: /rates
    responseType: application/json
  - name: other
    method: GET
    baseUrl: http://127.0.0.1:9
    pathname: /other
    responseType: application/json
"#,
        );

        let mut output = OutputWriter::with_writer(
            OutputFormat::Json,
            false,
            false,
            Box::new(SharedBuffer::default()),
        );
        let mut args = run_args(file.path());
        args.no_fallback = true;

        let error = handle_run(args, &mut output).await.unwrap_err();
        assert!(matches!(
            error,
            Error::Core(racefetch_core::Error::Transport { ref provider, .. }) if provider == "down"
        ));
        assert_eq!(error.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_run_saves_to_file() {
        let server = MockServer::start().await;
        Mock::given(path("/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_string("pong"))
            .mount(&server)
            .await;

        let file = providers_file(&format!(
            r#"
providers:
  - name: ping
    method: GET
    baseUrl: {}
    pathname: /ping
    responseType: text/plain
"#,
            server.uri()
        ));
        let target = tempfile::tempdir().unwrap();
        let save_to: PathBuf = target.path().join("response.json");

        let buffer = SharedBuffer::default();
        let mut output =
            OutputWriter::with_writer(OutputFormat::Json, false, false, Box::new(buffer.clone()));
        let mut args = run_args(file.path());
        args.save_to = Some(save_to.clone());
        handle_run(args, &mut output).await.unwrap();

        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&save_to).unwrap()).unwrap();
        assert_eq!(saved["payload"], json!({ "$text": "pong" }));
        assert_eq!(buffer.contents(), "");
    }

    #[tokio::test]
    async fn test_run_missing_file() {
        let mut output = OutputWriter::with_writer(
            OutputFormat::Json,
            false,
            false,
            Box::new(SharedBuffer::default()),
        );
        let error = handle_run(run_args(Path::new("/nonexistent/providers.yaml")), &mut output)
            .await
            .unwrap_err();
        assert_eq!(error.exit_code(), 3);
    }
}
