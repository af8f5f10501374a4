//! Rules resource store.
//!
//! Access rules come in two kinds with symmetric APIs: domain rules
//! (`api/rules/domain`) match a whole domain, URL rules (`api/rules/url`)
//! match an exact URL. Both bind a pattern to a group. Lookup values in the
//! `for/...` routes are percent-encoded since domains and URLs carry
//! characters that are reserved in a path segment.

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use gateward_core::{GroupId, RuleId, UserId};

use crate::client::Client;
use crate::error::Result;
use crate::models::{DomainRule, NewDomainRule, NewUrlRule, UrlRule};

/// Operations over the Rules resource (domain and URL rules).
#[derive(Debug, Clone, Copy)]
pub struct Rules<'a> {
    client: &'a Client,
}

impl<'a> Rules<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    // =========================================================================
    // Domain rules
    // =========================================================================

    /// List all domain rules.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::ClientError`] from the request path.
    pub async fn list_domain(&self) -> Result<Vec<DomainRule>> {
        self.client.get("api/rules/domain").await
    }

    /// Create a domain rule.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::ClientError`] from the request path.
    pub async fn add_domain(&self, rule: &NewDomainRule) -> Result<DomainRule> {
        self.client.post("api/rules/domain", rule).await
    }

    /// Fetch one domain rule by id.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::ClientError`]; `NotFound` if no such rule exists.
    pub async fn get_domain(&self, id: RuleId) -> Result<DomainRule> {
        self.client.get(&format!("api/rules/domain/{id}")).await
    }

    /// Delete a domain rule.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::ClientError`]; deleting an already-deleted id
    /// yields `NotFound`.
    pub async fn remove_domain(&self, id: RuleId) -> Result<()> {
        self.client
            .delete_unit(&format!("api/rules/domain/{id}"))
            .await
    }

    /// List the domain rules matching a domain.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::ClientError`] from the request path.
    pub async fn domain_for_domain(&self, domain: &str) -> Result<Vec<DomainRule>> {
        self.client
            .get(&format!("api/rules/domain/for/domain/{}", encode(domain)))
            .await
    }

    /// List the domain rules granted to a group.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::ClientError`] from the request path.
    pub async fn domain_for_group(&self, group_id: GroupId) -> Result<Vec<DomainRule>> {
        self.client
            .get(&format!("api/rules/domain/for/group/{group_id}"))
            .await
    }

    /// List the domain rules reaching a user through their groups.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::ClientError`] from the request path.
    pub async fn domain_for_user(&self, user_id: UserId) -> Result<Vec<DomainRule>> {
        self.client
            .get(&format!("api/rules/domain/for/user/{user_id}"))
            .await
    }

    // =========================================================================
    // URL rules
    // =========================================================================

    /// List all URL rules.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::ClientError`] from the request path.
    pub async fn list_url(&self) -> Result<Vec<UrlRule>> {
        self.client.get("api/rules/url").await
    }

    /// Create a URL rule.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::ClientError`] from the request path.
    pub async fn add_url(&self, rule: &NewUrlRule) -> Result<UrlRule> {
        self.client.post("api/rules/url", rule).await
    }

    /// Fetch one URL rule by id.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::ClientError`]; `NotFound` if no such rule exists.
    pub async fn get_url(&self, id: RuleId) -> Result<UrlRule> {
        self.client.get(&format!("api/rules/url/{id}")).await
    }

    /// Delete a URL rule.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::ClientError`]; deleting an already-deleted id
    /// yields `NotFound`.
    pub async fn remove_url(&self, id: RuleId) -> Result<()> {
        self.client.delete_unit(&format!("api/rules/url/{id}")).await
    }

    /// List the URL rules matching a URL.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::ClientError`] from the request path.
    pub async fn url_for_url(&self, url: &str) -> Result<Vec<UrlRule>> {
        self.client
            .get(&format!("api/rules/url/for/url/{}", encode(url)))
            .await
    }

    /// List the URL rules granted to a group.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::ClientError`] from the request path.
    pub async fn url_for_group(&self, group_id: GroupId) -> Result<Vec<UrlRule>> {
        self.client
            .get(&format!("api/rules/url/for/group/{group_id}"))
            .await
    }

    /// List the URL rules reaching a user through their groups.
    ///
    /// # Errors
    ///
    /// Propagates [`crate::ClientError`] from the request path.
    pub async fn url_for_user(&self, user_id: UserId) -> Result<Vec<UrlRule>> {
        self.client
            .get(&format!("api/rules/url/for/user/{user_id}"))
            .await
    }
}

/// Percent-encode a rule lookup value for use as a path segment.
fn encode(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_values_are_path_safe() {
        assert_eq!(encode("example.com"), "example%2Ecom");
        assert_eq!(
            encode("https://example.com/a?b=c"),
            "https%3A%2F%2Fexample%2Ecom%2Fa%3Fb%3Dc"
        );
    }
}
