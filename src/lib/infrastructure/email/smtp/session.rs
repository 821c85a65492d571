//! SMTP session over a lettre connection

use std::{fmt, time::Duration};

use lettre::transport::smtp::{
    authentication::{Credentials, Mechanism},
    client::{SmtpConnection, TlsParameters},
    extension::ClientId,
};
#[cfg(test)]
use mockall::mock;
use tracing::{debug, warn};

use crate::domain::{communication::mailer::SendError, credentials::Secret};

use super::SMTPConfig;

/// Opens plaintext connections to the relay
pub trait RelayConnector: Send + Sync + 'static {
    /// Connects and greets the relay, without encryption yet
    fn connect(&self) -> Result<Box<dyn RelaySession>, SendError>;
}

/// One connection to the relay.
///
/// [`RelaySession::close`] must be called exactly once on every session
/// that was opened.
pub trait RelaySession: Send {
    /// Upgrades the connection with STARTTLS
    fn starttls(&mut self) -> Result<(), SendError>;

    /// Authenticates as `account`
    fn authenticate(&mut self, account: &str, secret: &Secret) -> Result<(), SendError>;

    /// Transmits the whole message
    fn deliver(&mut self, email: &lettre::Message) -> Result<(), SendError>;

    /// Says goodbye and shuts the socket down
    fn close(&mut self);
}

#[cfg(test)]
mock! {
    pub RelayConnector {}

    impl RelayConnector for RelayConnector {
        fn connect(&self) -> Result<Box<dyn RelaySession>, SendError>;
    }
}

#[cfg(test)]
mock! {
    pub RelaySession {}

    impl RelaySession for RelaySession {
        fn starttls(&mut self) -> Result<(), SendError>;
        fn authenticate(&mut self, account: &str, secret: &Secret) -> Result<(), SendError>;
        fn deliver(&mut self, email: &lettre::Message) -> Result<(), SendError>;
        fn close(&mut self);
    }
}

/// Connects to the configured relay with lettre
#[derive(Debug, Clone)]
pub struct LettreConnector {
    config: SMTPConfig,
}

impl LettreConnector {
    /// Create a new connector
    pub fn new(config: SMTPConfig) -> Self {
        Self { config }
    }
}

impl RelayConnector for LettreConnector {
    fn connect(&self) -> Result<Box<dyn RelaySession>, SendError> {
        let tls = TlsParameters::builder(self.config.host.clone())
            .dangerous_accept_invalid_certs(!self.config.verify_tls)
            .build()
            .map_err(SendError::transport)?;

        let hello = ClientId::default();

        let connection = SmtpConnection::connect(
            (self.config.host.as_str(), self.config.port),
            Some(Duration::from_secs(self.config.timeout_secs)),
            &hello,
            None,
            None,
        )
        .map_err(|e| {
            warn!(host = %self.config.host, port = self.config.port, "could not reach relay: {e}");

            SendError::transport(e)
        })?;

        debug!(host = %self.config.host, port = self.config.port, "connected to relay");

        Ok(Box::new(LettreSession {
            connection,
            tls,
            hello,
        }))
    }
}

/// A live lettre SMTP connection
pub struct LettreSession {
    connection: SmtpConnection,
    tls: TlsParameters,
    hello: ClientId,
}

impl fmt::Debug for LettreSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LettreSession").finish_non_exhaustive()
    }
}

impl RelaySession for LettreSession {
    fn starttls(&mut self) -> Result<(), SendError> {
        if !self.connection.can_starttls() {
            return Err(SendError::transport("relay does not offer STARTTLS"));
        }

        self.connection
            .starttls(&self.tls, &self.hello)
            .map_err(SendError::transport)?;

        debug!("connection upgraded with STARTTLS");

        Ok(())
    }

    fn authenticate(&mut self, account: &str, secret: &Secret) -> Result<(), SendError> {
        let credentials = Credentials::new(account.to_string(), secret.expose().to_string());

        self.connection
            .auth(&[Mechanism::Plain, Mechanism::Login], &credentials)
            .map_err(|e| {
                // 5xx replies to AUTH mean the relay refused the credentials
                if e.is_permanent() {
                    SendError::AuthenticationFailed
                } else {
                    SendError::transport(e)
                }
            })?;

        Ok(())
    }

    fn deliver(&mut self, email: &lettre::Message) -> Result<(), SendError> {
        self.connection
            .send(email.envelope(), &email.formatted())
            .map_err(SendError::transport)?;

        Ok(())
    }

    fn close(&mut self) {
        // sends QUIT, then shuts the socket down
        self.connection.abort();
    }
}
