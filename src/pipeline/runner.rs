//! Sequential fetch → patch → publish run.

use reqwest::Client;

use crate::config::Config;
use crate::download::Fetcher;
use crate::error::{Error, Result};
use crate::fs::{PublishPaths, StagingPaths, TimestampToken};
use crate::net::ConnectivityProbe;
use crate::notify::Notifier;
use crate::pipeline::outcome::{Outcome, Resource, RunReport, Stage};
use crate::playlist::PlaylistPatcher;
use crate::publish::Publisher;

/// One invocation of the signage job.
pub struct Pipeline<'a> {
    config: &'a Config,
    client: Client,
    notifier: &'a dyn Notifier,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a Config, client: Client, notifier: &'a dyn Notifier) -> Self {
        Self {
            config,
            client,
            notifier,
        }
    }

    /// Check connectivity, then run every stage.
    ///
    /// Only a failed connectivity check is an error; stage failures are
    /// recorded in the report.
    pub async fn run(&self, token: TimestampToken) -> Result<RunReport> {
        let probe = ConnectivityProbe::from_config(&self.config.probe);
        let probe_report = probe.run(self.notifier).await;
        if !probe_report.reachable {
            return Err(Error::Connectivity {
                address: probe.address().to_string(),
                attempts: probe_report.attempts,
            });
        }

        Ok(self.run_stages(token).await)
    }

    /// Run fetch, patch and publish without the connectivity check.
    pub async fn run_stages(&self, token: TimestampToken) -> RunReport {
        let staging = StagingPaths::from_config(self.config);
        let target = PublishPaths::for_token(self.config, &token);
        let token_str = token.to_string();
        let mut report = RunReport::new(token);

        tracing::info!(token = %token_str, "Starting signage update");

        let fetcher = Fetcher::new(&self.client, self.config.fetch_timeout())
            .with_progress(self.config.options.show_progress && !self.config.options.quiet);

        let sources = [
            (Resource::Image, self.config.image_url(), &staging.image),
            (Resource::Playlist, self.config.playlist_url(), &staging.playlist),
        ];

        for (resource, url, destination) in sources {
            let stage = Stage::Fetch(resource);
            if !self.admit(&mut report, stage) {
                continue;
            }
            let result = match url {
                Ok(url) => fetcher.fetch(&url, destination).await.map(|_| ()),
                Err(e) => Err(e),
            };
            self.settle(&mut report, stage, result).await;
        }

        if self.admit(&mut report, Stage::Patch) {
            let result = match PlaylistPatcher::from_config(self.config) {
                Ok(patcher) => patcher.patch(&staging.playlist, &token_str).await.map(|_| ()),
                Err(e) => Err(e),
            };
            self.settle(&mut report, Stage::Patch, result).await;
        }

        if self.admit(&mut report, Stage::Publish) {
            let result = Publisher::new(&staging, &target).publish().await;
            let published = result.is_ok();
            self.settle(&mut report, Stage::Publish, result).await;
            if published {
                report.published = Some(target);
            }
        }

        if report.succeeded() {
            let image = report
                .token
                .image_file_name(&self.config.output.image_extension);
            tracing::info!("Signage updated with {}", image);
            self.notifier
                .notify(&format!("PiInk: signage updated with {}", image))
                .await;
        } else {
            tracing::warn!(
                failed = report.failures(),
                skipped = report.skipped(),
                "Signage update incomplete"
            );
        }

        report
    }

    /// Record `stage` as skipped when the failure policy stops the run.
    fn admit(&self, report: &mut RunReport, stage: Stage) -> bool {
        if report.may_continue(self.config.options.on_failure) {
            return true;
        }
        tracing::info!("Skipping {} after earlier failure", stage);
        report.record(
            stage,
            Outcome::Skipped("halted after earlier failure".to_string()),
        );
        false
    }

    /// Turn a stage result into an outcome, logging and notifying failures.
    async fn settle(&self, report: &mut RunReport, stage: Stage, result: Result<()>) {
        let outcome = match &result {
            Ok(()) => Outcome::Success,
            Err(e) => Outcome::from(e),
        };

        match &outcome {
            Outcome::Success => tracing::debug!("{} done", stage),
            Outcome::Skipped(reason) => tracing::error!("{} skipped: {}", stage, reason),
            Outcome::Failed(reason) => {
                tracing::error!("{} failed: {}", stage, reason);
                self.notifier
                    .notify(&format!("PiInk: {} failed: {}", stage, reason))
                    .await;
            }
        }

        report.record(stage, outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FailurePolicy;
    use crate::notify::RecordingNotifier;
    use tempfile::{tempdir, TempDir};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const IMAGE: &[u8] = b"\xff\xd8\xff\xe0fake-jpeg";

    async fn storage(image_status: u16, playlist_status: u16) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/signage/out.jpg"))
            .respond_with(ResponseTemplate::new(image_status).set_body_bytes(IMAGE))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/signage/dv_signage.xml"))
            .respond_with(
                ResponseTemplate::new(playlist_status).set_body_string("<Image>out.jpg</Image>"),
            )
            .mount(&server)
            .await;
        server
    }

    fn config_for(server: &MockServer, dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.source.host_url = format!("{}/signage/", server.uri());
        config.source.image_url = "out.jpg".to_string();
        config.source.playlist_url = "dv_signage.xml".to_string();
        config.output.staging_dir = dir.path().join("media");
        config.output.out_folder = dir.path().join("out");
        config.probe.address = server.address().to_string();
        config.probe.max_attempts = 1;
        config
    }

    fn token() -> TimestampToken {
        TimestampToken::parse("20240101120000").unwrap()
    }

    #[tokio::test]
    async fn test_happy_path() {
        let server = storage(200, 200).await;
        let dir = tempdir().unwrap();
        let config = config_for(&server, &dir);
        let notifier = RecordingNotifier::default();

        let report = Pipeline::new(&config, Client::new(), &notifier)
            .run(token())
            .await
            .unwrap();

        assert!(report.succeeded());
        let published = report.published.unwrap();
        assert_eq!(published.image, dir.path().join("out/20240101120000.jpg"));
        assert_eq!(std::fs::read(&published.image).unwrap(), IMAGE);
        assert_eq!(
            std::fs::read_to_string(&published.playlist).unwrap(),
            "<Image>20240101120000.jpg</Image>"
        );
        assert_eq!(
            notifier.messages(),
            vec!["PiInk: signage updated with 20240101120000.jpg".to_string()]
        );
    }

    #[tokio::test]
    async fn test_image_failure_continues() {
        let server = storage(500, 200).await;
        let dir = tempdir().unwrap();
        let config = config_for(&server, &dir);
        let notifier = RecordingNotifier::default();

        let report = Pipeline::new(&config, Client::new(), &notifier)
            .run_stages(token())
            .await;

        assert!(report
            .outcome(Stage::Fetch(Resource::Image))
            .unwrap()
            .is_failed());
        assert_eq!(report.outcome(Stage::Patch), Some(&Outcome::Success));
        assert!(matches!(
            report.outcome(Stage::Publish),
            Some(Outcome::Skipped(_))
        ));
        assert!(report.published.is_none());

        let messages = notifier.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("download of image failed"));
        assert!(!dir.path().join("out/dv_signage.xml").exists());
    }

    #[tokio::test]
    async fn test_halt_policy_skips_rest() {
        let server = storage(500, 200).await;
        let dir = tempdir().unwrap();
        let mut config = config_for(&server, &dir);
        config.options.on_failure = FailurePolicy::Halt;
        let notifier = RecordingNotifier::default();

        let report = Pipeline::new(&config, Client::new(), &notifier)
            .run_stages(token())
            .await;

        assert_eq!(report.failures(), 1);
        assert_eq!(report.skipped(), 3);
        assert!(!dir.path().join("media/dv_signage.xml").exists());
        assert_eq!(notifier.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_unreachable_aborts() {
        let server = storage(200, 200).await;
        let dir = tempdir().unwrap();
        let mut config = config_for(&server, &dir);
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        config.probe.address = listener.local_addr().unwrap().to_string();
        drop(listener);
        config.probe.max_attempts = 2;
        config.probe.retry_delay_seconds = 0;
        let notifier = RecordingNotifier::default();

        let err = Pipeline::new(&config, Client::new(), &notifier)
            .run(token())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Connectivity { attempts: 2, .. }));
        assert_eq!(notifier.messages().len(), 1);
        assert!(!dir.path().join("media").exists());
    }
}
