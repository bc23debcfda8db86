//! Async D-Bus client for the online accounts service.

use futures_util::StreamExt;
use std::collections::{HashMap, HashSet};
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};
use zbus::fdo::ObjectManagerProxy;
use zbus::zvariant::{OwnedValue, Value};
use zbus::{Connection, MatchRule, MessageStream};

use super::AccountEvent;
use crate::models::{
    Account, AccountId, Error, Result, GOA_ACCOUNTS_PATH, GOA_ACCOUNT_INTERFACE,
    GOA_MANAGER_PATH, GOA_SERVICE_NAME,
};

/// Property map of one D-Bus interface.
type Properties = HashMap<String, OwnedValue>;

/// Handle to the accounts service.
#[derive(Clone)]
pub struct GoaClient {
    connection: Connection,
}

impl GoaClient {
    /// Connect to the session bus and make sure the service answers.
    ///
    /// The service is bus-activated, so the ping also starts it.
    pub async fn connect() -> Result<Self> {
        let connection = Connection::session()
            .await
            .map_err(|e| Error::ClientUnavailable(e.to_string()))?;
        debug!("Connected to session D-Bus");

        connection
            .call_method(
                Some(GOA_SERVICE_NAME),
                GOA_MANAGER_PATH,
                Some("org.freedesktop.DBus.Peer"),
                "Ping",
                &(),
            )
            .await
            .map_err(|e| Error::ClientUnavailable(e.to_string()))?;

        info!("Online accounts service is available");
        Ok(Self { connection })
    }

    async fn object_manager(&self) -> Result<ObjectManagerProxy<'static>> {
        let proxy = ObjectManagerProxy::builder(&self.connection)
            .destination(GOA_SERVICE_NAME)?
            .path(GOA_MANAGER_PATH)?
            .build()
            .await?;
        Ok(proxy)
    }

    /// Current account snapshot.
    pub async fn accounts(&self) -> Result<Vec<Account>> {
        let objects = self.object_manager().await?.get_managed_objects().await?;

        let mut accounts = Vec::new();
        for (path, interfaces) in &objects {
            let Some(props) = interfaces
                .iter()
                .find(|(name, _)| name.as_str() == GOA_ACCOUNT_INTERFACE)
                .map(|(_, props)| props)
            else {
                continue;
            };

            match account_from_properties(path.as_str(), props) {
                Ok(account) => accounts.push(account),
                Err(e) => warn!("Skipping account object: {}", e),
            }
        }

        debug!("Service reported {} account(s)", accounts.len());
        Ok(accounts)
    }

    /// Fetch one account's properties.
    pub async fn account(&self, path: &str) -> Result<Account> {
        let reply = self
            .connection
            .call_method(
                Some(GOA_SERVICE_NAME),
                path,
                Some("org.freedesktop.DBus.Properties"),
                "GetAll",
                &(GOA_ACCOUNT_INTERFACE,),
            )
            .await?;
        let props: Properties = reply.body().deserialize()?;
        account_from_properties(path, &props)
    }

    /// Ask the service to remove `account`.
    pub async fn remove_account(&self, account: &Account) -> Result<()> {
        info!("Requesting removal of account {}", account.id);

        self.connection
            .call_method(
                Some(GOA_SERVICE_NAME),
                account.object_path.as_str(),
                Some(GOA_ACCOUNT_INTERFACE),
                "Remove",
                &(),
            )
            .await
            .map(|_| ())
            .map_err(|e| Error::RemoveFailed {
                account: account.presentation_identity.clone(),
                reason: e.to_string(),
            })
    }

    /// Subscribe to notifications, deliver the account snapshot through
    /// `snapshot`, then forward add/change/remove notifications to `events`
    /// until either side goes away.
    ///
    /// Subscribing first means no notification can fall between the
    /// snapshot and the stream.
    pub async fn watch(
        &self,
        snapshot: oneshot::Sender<Result<Vec<Account>>>,
        events: UnboundedSender<AccountEvent>,
    ) -> Result<()> {
        let subscription = async {
            let manager = self.object_manager().await?;
            let added = manager.receive_interfaces_added().await?;
            let removed = manager.receive_interfaces_removed().await?;

            let rule = MatchRule::builder()
                .msg_type(zbus::message::Type::Signal)
                .sender(GOA_SERVICE_NAME)?
                .interface("org.freedesktop.DBus.Properties")?
                .member("PropertiesChanged")?
                .path_namespace(GOA_ACCOUNTS_PATH)?
                .arg(0, GOA_ACCOUNT_INTERFACE)?
                .build();
            let changed = MessageStream::for_match_rule(rule, &self.connection, None).await?;
            Ok::<_, Error>((added, removed, changed))
        }
        .await;

        let accounts = self.accounts().await;
        let mut seen = accounts
            .as_ref()
            .map(|accounts| SeenAccounts::from_snapshot(accounts))
            .unwrap_or_default();
        let _ = snapshot.send(accounts);
        let (mut added, mut removed, mut changed) = subscription?;

        debug!("Subscribed to account notifications");

        loop {
            let event = tokio::select! {
                Some(signal) = added.next() => {
                    let Ok(args) = signal.args() else { continue };
                    let has_account = args
                        .interfaces_and_properties()
                        .keys()
                        .any(|name| name.to_string() == GOA_ACCOUNT_INTERFACE);
                    if !has_account {
                        continue;
                    }
                    let path = args.object_path().to_string();
                    match self.account(&path).await {
                        Ok(account) => AccountEvent::Added(account),
                        Err(e) => {
                            warn!("Could not read added account {}: {}", path, e);
                            continue;
                        }
                    }
                }
                Some(signal) = removed.next() => {
                    let Ok(args) = signal.args() else { continue };
                    let has_account = args
                        .interfaces()
                        .iter()
                        .any(|name| name.to_string() == GOA_ACCOUNT_INTERFACE);
                    if !has_account {
                        continue;
                    }
                    AccountEvent::Removed(account_id_from_path(args.object_path().as_str()))
                }
                Some(message) = changed.next() => {
                    let message = match message {
                        Ok(message) => message,
                        Err(e) => {
                            warn!("Bad PropertiesChanged message: {}", e);
                            continue;
                        }
                    };
                    let Some(path) = message.header().path().map(|p| p.to_string()) else {
                        continue;
                    };
                    match self.account(&path).await {
                        Ok(account) => AccountEvent::Changed(account),
                        Err(e) => {
                            debug!("Could not refresh account {}: {}", path, e);
                            continue;
                        }
                    }
                }
                else => {
                    error!("Account notification streams closed");
                    return Err(Error::Dbus("notification streams closed".to_string()));
                }
            };

            if !seen.admit(&event) {
                continue;
            }
            if events.send(event).is_err() {
                debug!("Account notification receiver dropped");
                return Ok(());
            }
        }
    }
}

/// Account id for an object exported under the accounts path.
/// Accounts the list has been told about since the snapshot.
///
/// Subscriptions are made before the snapshot is read, so a removal
/// signalled in between arrives for an account the snapshot never held.
#[derive(Debug, Default)]
struct SeenAccounts {
    ids: HashSet<AccountId>,
}

impl SeenAccounts {
    fn from_snapshot(accounts: &[Account]) -> Self {
        Self {
            ids: accounts.iter().map(|account| account.id.clone()).collect(),
        }
    }

    /// Whether `event` should reach the list.
    fn admit(&mut self, event: &AccountEvent) -> bool {
        match event {
            AccountEvent::Added(account) => {
                self.ids.insert(account.id.clone());
                true
            }
            AccountEvent::Changed(_) => true,
            AccountEvent::Removed(id) => {
                let known = self.ids.remove(id);
                if !known {
                    debug!("Dropping removal of {} queued before the snapshot", id);
                }
                known
            }
        }
    }
}

pub(crate) fn account_id_from_path(path: &str) -> AccountId {
    AccountId::new(path.rsplit('/').next().unwrap_or(path))
}

fn string_property(props: &Properties, key: &str) -> Option<String> {
    match props.get(key).map(|value| &**value) {
        Some(Value::Str(s)) => Some(s.as_str().to_owned()),
        _ => None,
    }
}

fn bool_property(props: &Properties, key: &str) -> bool {
    matches!(props.get(key).map(|value| &**value), Some(Value::Bool(true)))
}

/// Build an account snapshot from the Account interface properties.
pub(crate) fn account_from_properties(path: &str, props: &Properties) -> Result<Account> {
    let id = string_property(props, "Id").ok_or_else(|| Error::malformed(path, "missing Id"))?;
    let provider_type = string_property(props, "ProviderType")
        .ok_or_else(|| Error::malformed(path, "missing ProviderType"))?;

    Ok(Account {
        id: AccountId::new(id),
        object_path: path.to_owned(),
        provider_type,
        provider_name: string_property(props, "ProviderName").unwrap_or_default(),
        provider_icon: string_property(props, "ProviderIcon").unwrap_or_default(),
        presentation_identity: string_property(props, "PresentationIdentity").unwrap_or_default(),
        attention_needed: bool_property(props, "AttentionNeeded"),
        locked: bool_property(props, "IsLocked"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(value: Value<'_>) -> OwnedValue {
        value.try_into().expect("plain values convert")
    }

    fn props(entries: Vec<(&str, Value<'static>)>) -> Properties {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), owned(v)))
            .collect()
    }

    #[test]
    fn test_account_from_properties() {
        let props = props(vec![
            ("Id", Value::from("account_1700000000_0")),
            ("ProviderType", Value::from("google")),
            ("ProviderName", Value::from("Google")),
            ("ProviderIcon", Value::from(". GThemedIcon goa-account-google")),
            ("PresentationIdentity", Value::from("me@example.com")),
            ("AttentionNeeded", Value::from(true)),
            ("IsLocked", Value::from(false)),
        ]);
        let path = "/org/gnome/OnlineAccounts/Accounts/account_1700000000_0";
        let account = account_from_properties(path, &props).expect("valid account");

        assert_eq!(account.id.as_str(), "account_1700000000_0");
        assert_eq!(account.object_path, path);
        assert_eq!(account.provider_name, "Google");
        assert_eq!(account.presentation_identity, "me@example.com");
        assert!(account.attention_needed);
        assert!(!account.locked);
    }

    #[test]
    fn test_missing_id_is_malformed() {
        let props = props(vec![("ProviderType", Value::from("google"))]);
        let err = account_from_properties("/x", &props).expect_err("no Id");
        assert!(matches!(err, Error::MalformedAccount { .. }));
    }

    #[test]
    fn test_wrong_types_fall_back() {
        let props = props(vec![
            ("Id", Value::from("a")),
            ("ProviderType", Value::from("imap_smtp")),
            ("AttentionNeeded", Value::from("yes")),
            ("ProviderName", Value::from(7u32)),
        ]);
        let account = account_from_properties("/x/a", &props).expect("valid account");
        assert!(!account.attention_needed);
        assert_eq!(account.provider_name, "");
    }

    #[test]
    fn test_account_id_from_path() {
        assert_eq!(
            account_id_from_path("/org/gnome/OnlineAccounts/Accounts/account_1_0").as_str(),
            "account_1_0"
        );
        assert_eq!(account_id_from_path("plain").as_str(), "plain");
    }

    #[test]
    fn test_removal_queued_before_snapshot_is_dropped() {
        let mut seen = SeenAccounts::from_snapshot(&[Account::new("a", "google")]);

        assert!(!seen.admit(&AccountEvent::Removed("gone".into())));
        assert!(seen.admit(&AccountEvent::Removed("a".into())));
        assert!(!seen.admit(&AccountEvent::Removed("a".into())));
    }

    #[test]
    fn test_added_accounts_can_be_removed() {
        let mut seen = SeenAccounts::default();

        assert!(seen.admit(&AccountEvent::Added(Account::new("b", "imap_smtp"))));
        assert!(seen.admit(&AccountEvent::Changed(Account::new("b", "imap_smtp"))));
        assert!(seen.admit(&AccountEvent::Removed("b".into())));
    }
}
