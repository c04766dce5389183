use std::collections::BTreeMap;

pub type AccountId = String;

/// Account identifier to the ordered list of storage slots its inventory is written to.
///
/// Loaded once at startup and never mutated afterwards. An empty config is valid
/// and handled as its own terminal case by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccountConfig {
    accounts: BTreeMap<AccountId, Vec<String>>,
}

impl AccountConfig {
    pub fn new(accounts: BTreeMap<AccountId, Vec<String>>) -> Self {
        Self { accounts }
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn slots(&self, account_id: &str) -> Option<&[String]> {
        self.accounts.get(account_id).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.accounts
            .iter()
            .map(|(id, slots)| (id.as_str(), slots.as_slice()))
    }
}

impl<I, S> FromIterator<(I, Vec<S>)> for AccountConfig
where
    I: Into<AccountId>,
    S: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (I, Vec<S>)>>(iter: T) -> Self {
        let accounts = iter
            .into_iter()
            .map(|(id, slots)| (id.into(), slots.into_iter().map(Into::into).collect()))
            .collect();
        Self { accounts }
    }
}
