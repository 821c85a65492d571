//! SMTP mail transport implementation

mod session;

use clap::Parser;
use tracing::{debug, info, warn};

pub use session::{LettreConnector, LettreSession, RelayConnector, RelaySession};

use crate::domain::{
    communication::mailer::{MailTransport, Message, SendError},
    credentials::Secret,
};

/// SMTP relay configuration
#[derive(Clone, Debug, Parser)]
pub struct SMTPConfig {
    /// The SMTP host
    #[clap(long = "smtp-host", env = "SMTP_HOST", default_value = "smtp.mail.me.com")]
    pub host: String,

    /// The SMTP submission port
    #[clap(long = "smtp-port", env = "SMTP_PORT", default_value = "587")]
    pub port: u16,

    /// Seconds to wait on the relay before giving up
    #[clap(long = "smtp-timeout", env = "SMTP_TIMEOUT", default_value = "30")]
    pub timeout_secs: u64,

    /// Verify the TLS certificate
    #[clap(
        long = "smtp-verify-tls",
        env = "SMTP_VERIFY_TLS",
        default_value = "true",
        action = clap::ArgAction::Set
    )]
    pub verify_tls: bool,
}

impl Default for SMTPConfig {
    fn default() -> Self {
        Self {
            host: "smtp.mail.me.com".to_string(),
            port: 587,
            timeout_secs: 30,
            verify_tls: true,
        }
    }
}

/// Delivers messages through a single relay, one connection per message
#[derive(Debug, Clone)]
pub struct SMTPMailer<C: RelayConnector> {
    connector: C,
}

impl SMTPMailer<LettreConnector> {
    /// Create a new SMTP mailer for the configured relay
    pub fn from_config(config: SMTPConfig) -> Self {
        Self::new(LettreConnector::new(config))
    }
}

impl<C: RelayConnector> SMTPMailer<C> {
    /// Create a new SMTP mailer using `connector`
    pub fn new(connector: C) -> Self {
        Self { connector }
    }
}

impl<C: RelayConnector> MailTransport for SMTPMailer<C> {
    fn send(&self, message: &Message, account: &str, secret: &Secret) -> Result<(), SendError> {
        let mut session = self.connector.connect()?;

        let result = exchange(session.as_mut(), message, account, secret);

        session.close();
        debug!("relay connection closed");

        match &result {
            Ok(()) => info!(recipient = %message.recipient(), "email sent"),
            Err(SendError::AuthenticationFailed) => {
                warn!(account, "authentication failed, check the account and app-specific password")
            }
            Err(e) => warn!("failed to send email: {e}"),
        }

        result
    }
}

fn exchange(
    session: &mut dyn RelaySession,
    message: &Message,
    account: &str,
    secret: &Secret,
) -> Result<(), SendError> {
    session.starttls()?;
    session.authenticate(account, secret)?;
    session.deliver(message.email())
}

#[cfg(test)]
mod tests {
    use std::{
        io::{BufRead, BufReader, Write},
        net::TcpListener,
        thread,
    };

    use mockall::Sequence;
    use testresult::TestResult;

    use crate::domain::communication::{email_addresses::EmailAddress, mailer::Attachment};

    use super::session::{MockRelayConnector, MockRelaySession};
    use super::*;

    fn message() -> Message {
        Message::new(
            EmailAddress::new("sender@example.com").unwrap(),
            EmailAddress::new("support@example.com").unwrap(),
            "Diagnostics",
            "",
            Attachment::new("report.txt", b"report".to_vec()),
        )
        .unwrap()
    }

    fn connector_for(session: MockRelaySession) -> MockRelayConnector {
        let mut connector = MockRelayConnector::new();
        connector
            .expect_connect()
            .times(1)
            .return_once(move || Ok(Box::new(session) as Box<dyn RelaySession>));
        connector
    }

    #[test]
    fn test_send_runs_starttls_auth_deliver_then_closes() -> TestResult {
        let mut seq = Sequence::new();
        let mut session = MockRelaySession::new();

        session
            .expect_starttls()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(()));
        session
            .expect_authenticate()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|account, secret| account == "sender@example.com" && secret.expose() == "pw")
            .returning(|_, _| Ok(()));
        session
            .expect_deliver()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        session
            .expect_close()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());

        let mailer = SMTPMailer::new(connector_for(session));

        mailer.send(&message(), "sender@example.com", &Secret::new("pw"))?;

        Ok(())
    }

    #[test]
    fn test_rejected_credentials_release_connection() {
        let mut session = MockRelaySession::new();

        session.expect_starttls().times(1).returning(|| Ok(()));
        session
            .expect_authenticate()
            .times(1)
            .returning(|_, _| Err(SendError::AuthenticationFailed));
        session.expect_deliver().times(0);
        session.expect_close().times(1).return_const(());

        let mailer = SMTPMailer::new(connector_for(session));

        let result = mailer.send(&message(), "sender@example.com", &Secret::new("wrong"));

        assert!(matches!(result, Err(SendError::AuthenticationFailed)));
    }

    #[test]
    fn test_failed_upgrade_never_sends_credentials() {
        let mut session = MockRelaySession::new();

        session
            .expect_starttls()
            .times(1)
            .returning(|| Err(SendError::transport("relay does not offer STARTTLS")));
        session.expect_authenticate().times(0);
        session.expect_deliver().times(0);
        session.expect_close().times(1).return_const(());

        let mailer = SMTPMailer::new(connector_for(session));

        let result = mailer.send(&message(), "sender@example.com", &Secret::new("pw"));

        assert!(matches!(result, Err(SendError::TransportError { .. })));
    }

    #[test]
    fn test_failed_delivery_releases_connection() {
        let mut session = MockRelaySession::new();

        session.expect_starttls().times(1).returning(|| Ok(()));
        session.expect_authenticate().times(1).returning(|_, _| Ok(()));
        session
            .expect_deliver()
            .times(1)
            .returning(|_| Err(SendError::transport("552 message size exceeds limit")));
        session.expect_close().times(1).return_const(());

        let mailer = SMTPMailer::new(connector_for(session));

        let result = mailer.send(&message(), "sender@example.com", &Secret::new("pw"));

        assert!(matches!(
            result,
            Err(SendError::TransportError { detail }) if detail.contains("552")
        ));
    }

    #[test]
    fn test_connect_failure_is_transport_error() {
        let mut connector = MockRelayConnector::new();
        connector
            .expect_connect()
            .times(1)
            .returning(|| Err(SendError::transport("connection refused")));

        let mailer = SMTPMailer::new(connector);

        let result = mailer.send(&message(), "sender@example.com", &Secret::new("pw"));

        assert!(matches!(result, Err(SendError::TransportError { .. })));
    }

    #[test]
    fn test_default_relay_is_submission_port() {
        let config = SMTPConfig::default();

        assert_eq!(config.host, "smtp.mail.me.com");
        assert_eq!(config.port, 587);
        assert!(config.verify_tls);
    }

    #[test]
    fn test_unreachable_relay_is_transport_error() -> TestResult {
        let port = TcpListener::bind("127.0.0.1:0")?.local_addr()?.port();

        let mailer = SMTPMailer::from_config(SMTPConfig {
            host: "127.0.0.1".to_string(),
            port,
            timeout_secs: 5,
            verify_tls: false,
        });

        let result = mailer.send(&message(), "sender@example.com", &Secret::new("pw"));

        assert!(matches!(result, Err(SendError::TransportError { .. })));

        Ok(())
    }

    #[test]
    fn test_relay_without_starttls_never_sees_credentials() -> TestResult {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();

        let relay = thread::spawn(move || -> std::io::Result<Vec<String>> {
            let (stream, _) = listener.accept()?;
            let mut writer = stream.try_clone()?;
            let mut reader = BufReader::new(stream);
            let mut received = Vec::new();

            writer.write_all(b"220 localhost ESMTP test relay\r\n")?;

            loop {
                let mut line = String::new();
                if reader.read_line(&mut line)? == 0 {
                    break;
                }

                let command = line.trim_end().to_string();
                received.push(command.clone());

                if command.starts_with("EHLO") {
                    writer.write_all(b"250 localhost\r\n")?;
                } else if command.starts_with("QUIT") {
                    writer.write_all(b"221 bye\r\n")?;
                    break;
                } else {
                    writer.write_all(b"500 unrecognized command\r\n")?;
                }
            }

            Ok(received)
        });

        let mailer = SMTPMailer::from_config(SMTPConfig {
            host: "127.0.0.1".to_string(),
            port,
            timeout_secs: 5,
            verify_tls: false,
        });

        let result = mailer.send(&message(), "sender@example.com", &Secret::new("pw"));

        let received = relay.join().expect("relay thread panicked")?;

        assert!(matches!(result, Err(SendError::TransportError { .. })));
        assert!(received.iter().any(|line| line.starts_with("EHLO")));
        assert!(!received.iter().any(|line| line.starts_with("AUTH")));
        assert!(received.iter().any(|line| line.starts_with("QUIT")));

        Ok(())
    }
}
