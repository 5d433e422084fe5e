//! tests/campaign_tests.rs
//! Corridas completas con transporte/sleeper/reporter de prueba.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use crate::config::app_config::{AppConfig, Credentials};
    use crate::errors::{CampaignError, TransportError};
    use crate::models::outcome_model::RunSummary;
    use crate::services::campaign_service::CampaignService;
    use crate::services::email_service::{EmailService, MailTransport, DRY_RUN_SENDER};
    use crate::services::rate_limit_service::RateLimiter;
    use crate::tests::support::{
        test_config, write_file, FailingTransport, MemoryReporter, RecordingDelay,
        ScriptedTransport,
    };

    const CONTACTS: &str = "SNo,Name,Email,Title,Company\n\
        1,Ana,ana@acme.com,HR Lead,Acme\n\
        2,Luis,luis@globex.com,Recruiter,Globex\n\
        3,Eva,,CTO,Initech\n";

    struct Run {
        campaign: CampaignService,
        delay: Arc<RecordingDelay>,
        reporter: Arc<MemoryReporter>,
    }

    fn campaign_with(config: AppConfig, transport: Arc<dyn MailTransport>) -> Run {
        let delay = Arc::new(RecordingDelay::default());
        let reporter = Arc::new(MemoryReporter::default());
        let email_service = EmailService::new(transport, delay.clone(), reporter.clone(), DRY_RUN_SENDER);
        let limiter = RateLimiter::new(config.send_interval(), delay.clone());
        Run {
            campaign: CampaignService::new(config, email_service, limiter, reporter.clone()),
            delay,
            reporter,
        }
    }

    fn log_statuses(config: &AppConfig) -> Vec<String> {
        let mut reader = csv::Reader::from_path(&config.log_path).unwrap();
        reader
            .records()
            .map(|r| r.unwrap()[6].to_string())
            .collect()
    }

    #[actix_rt::test]
    async fn test_dry_run_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        write_file(dir.path(), "contacts.csv", CONTACTS);

        let run = campaign_with(config.clone(), Arc::new(ScriptedTransport::default()));
        let summary = run.campaign.run().await.unwrap();

        assert_eq!(
            summary,
            RunSummary {
                total: 3,
                sent: 0,
                previewed: 2,
                failed: 0,
                skipped: 1,
            }
        );
        assert_eq!(log_statuses(&config), vec!["previewed", "previewed", "skipped"]);
        assert_eq!(run.reporter.summaries(), vec![summary]);

        // una pausa de 3s después de cada envío que no sea el último
        assert_eq!(
            run.delay.sleeps(),
            vec![Duration::from_secs(3), Duration::from_secs(3)]
        );
    }

    #[actix_rt::test]
    async fn test_skipped_row_logs_every_reason() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        write_file(
            dir.path(),
            "contacts.csv",
            "SNo,Name,Email,Title,Company\n9,,bad@,HR,Acme\n",
        );

        let run = campaign_with(config.clone(), Arc::new(ScriptedTransport::default()));
        run.campaign.run().await.unwrap();

        let mut reader = csv::Reader::from_path(&config.log_path).unwrap();
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[6], "skipped");
        assert_eq!(
            &row[7],
            "Missing required field 'Name'; Invalid email address: 'bad@'"
        );
        assert!(run.delay.sleeps().is_empty());
    }

    #[actix_rt::test]
    async fn test_no_pause_after_last_sent_contact() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        write_file(
            dir.path(),
            "contacts.csv",
            "SNo,Name,Email,Title,Company\n1,Ana,ana@acme.com,HR,Acme\n",
        );

        let run = campaign_with(config.clone(), Arc::new(ScriptedTransport::default()));
        let summary = run.campaign.run().await.unwrap();

        assert_eq!(summary.previewed, 1);
        assert_eq!(log_statuses(&config), vec!["previewed"]);
        assert!(run.delay.sleeps().is_empty());
    }

    #[actix_rt::test]
    async fn test_second_run_only_appends() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        write_file(dir.path(), "contacts.csv", CONTACTS);

        let run = campaign_with(config.clone(), Arc::new(ScriptedTransport::default()));
        run.campaign.run().await.unwrap();
        let first = std::fs::read_to_string(&config.log_path).unwrap();

        run.campaign.run().await.unwrap();
        let second = std::fs::read_to_string(&config.log_path).unwrap();

        assert!(second.starts_with(&first));
        assert_eq!(log_statuses(&config).len(), 6);
    }

    #[actix_rt::test]
    async fn test_builtin_template_subject_in_preview() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        write_file(
            dir.path(),
            "contacts.csv",
            "SNo,Name,Email,Title,Company\n1,Ana,ana@acme.com,HR,Acme\n",
        );

        let run = campaign_with(config, Arc::new(ScriptedTransport::default()));
        run.campaign.run().await.unwrap();

        let previews = run.reporter.previews();
        assert_eq!(previews.len(), 1);
        assert_eq!(
            previews[0].subject,
            "Connecting about potential opportunities at Acme"
        );
    }

    #[actix_rt::test]
    async fn test_custom_template_and_attachment() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        write_file(
            dir.path(),
            "contacts.csv",
            "SNo,Name,Email,Title,Company\n1,Ana,ana@acme.com,HR,Acme\n",
        );
        write_file(dir.path(), "template.txt", "Subject: Hola {Name}\n\nSaludos a {Company}");
        let pdf = write_file(dir.path(), "resume.pdf", "%PDF-1.4");

        let run = campaign_with(config, Arc::new(ScriptedTransport::default()));
        run.campaign.run().await.unwrap();

        let preview = &run.reporter.previews()[0];
        assert_eq!(preview.subject, "Hola Ana");
        assert_eq!(preview.body_excerpt, "Saludos a Acme");
        assert_eq!(preview.attachment, Some((pdf, true)));
    }

    #[actix_rt::test]
    async fn test_live_failures_do_not_stop_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.dry_run = false;
        config.credentials = Some(Credentials::new("me@gmail.com", "app-pass"));
        write_file(dir.path(), "contacts.csv", CONTACTS);

        let transport = Arc::new(FailingTransport(TransportError::Transient(
            "connection reset".to_string(),
        )));
        let run = campaign_with(config.clone(), transport);
        let summary = run.campaign.run().await.unwrap();

        assert_eq!(summary.failed, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.sent, 0);
        assert_eq!(log_statuses(&config), vec!["failed", "failed", "skipped"]);
        // por contacto enviado: 2 backoffs + 1 pausa de rate limit
        assert_eq!(run.delay.sleeps().len(), 6);
    }

    #[actix_rt::test]
    async fn test_live_send_counts_sent() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = test_config(dir.path());
        config.dry_run = false;
        config.credentials = Some(Credentials::new("me@gmail.com", "app-pass"));
        write_file(dir.path(), "contacts.csv", CONTACTS);

        let transport = Arc::new(ScriptedTransport::new(vec![Err(TransportError::Transient(
            "421".to_string(),
        ))]));
        let run = campaign_with(config.clone(), transport.clone());
        let summary = run.campaign.run().await.unwrap();

        assert_eq!(summary.sent, 2);
        assert_eq!(transport.calls(), 3);
        assert_eq!(log_statuses(&config), vec!["sent", "sent", "skipped"]);
    }

    #[actix_rt::test]
    async fn test_missing_contacts_file_aborts_without_log() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());

        let run = campaign_with(config.clone(), Arc::new(ScriptedTransport::default()));
        let err = run.campaign.run().await.unwrap_err();

        assert!(matches!(err, CampaignError::Ingestion { .. }));
        assert!(!config.log_path.exists());
        assert!(run.reporter.summaries().is_empty());
    }
}
