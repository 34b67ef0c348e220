//! Gateway form URLs.
//!
//! ```text
//! {base}/v1/forms/{withdraw|details}
//!     ?Public-Key={account key}&Asset-Id={asset}&Address={account address}
//!     &AuthHash={hash}&AuthNonce={nonce}
//! ```
//!
//! Everything the URL needs is passed in a [`GatewayRequest`]; there is no
//! ambient "current account" to reach for. `{base}` is the currency's own
//! endpoint when one is configured, the shared one otherwise.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use url::Url;

use super::error::HandshakeError;
use super::handshake::{GatewayHandshake, HandshakeMaterial};
use crate::config::NetworkParams;
use crate::identity::Account;
use crate::money::Currency;

/// Which gateway form to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatewayForm {
    /// Withdraw the asset out to an external account.
    Withdraw,
    /// Deposit details for the asset.
    Details,
}

impl GatewayForm {
    pub fn path(&self) -> &'static str {
        match self {
            GatewayForm::Withdraw => "withdraw",
            GatewayForm::Details => "details",
        }
    }
}

impl fmt::Display for GatewayForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Parameters of one gateway form request.
#[derive(Debug, Clone, Copy)]
pub struct GatewayRequest<'a> {
    pub form: GatewayForm,
    pub currency: &'a Currency,
    pub account: &'a Account,
}

/// A handshake bound to a gateway endpoint.
#[derive(Debug, Clone)]
pub struct Gateway {
    base_url: Url,
    currency_urls: HashMap<Currency, Url>,
    handshake: GatewayHandshake,
}

impl Gateway {
    pub fn new(base_url: Url, handshake: GatewayHandshake) -> Self {
        Self {
            base_url,
            currency_urls: HashMap::new(),
            handshake,
        }
    }

    pub fn from_params(params: &NetworkParams) -> Self {
        let mut gateway = Self::new(
            params.gateway_url.clone(),
            GatewayHandshake::new(params.gateway_public_key),
        );
        gateway.currency_urls = params.currency_gateway_urls.clone();
        gateway
    }

    /// Route `currency` to its own endpoint.
    pub fn with_currency_url(mut self, currency: Currency, url: Url) -> Self {
        self.currency_urls.insert(currency, url);
        self
    }

    /// The shared endpoint.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn base_url_for(&self, currency: &Currency) -> &Url {
        self.currency_urls.get(currency).unwrap_or(&self.base_url)
    }

    /// Authorise and build the form URL with a fresh nonce.
    pub fn form_url(&self, request: GatewayRequest<'_>) -> Result<Url, HandshakeError> {
        let asset_id = Self::asset_id(request.currency)?;
        let material = self.handshake.authorize(request.account, asset_id)?;
        self.url_for(request, asset_id, &material)
    }

    /// Deterministic variant of [`Gateway::form_url`].
    pub fn form_url_with_nonce(
        &self,
        request: GatewayRequest<'_>,
        nonce: [u8; 32],
    ) -> Result<Url, HandshakeError> {
        let asset_id = Self::asset_id(request.currency)?;
        let material = self
            .handshake
            .authorize_with_nonce(request.account, asset_id, nonce)?;
        self.url_for(request, asset_id, &material)
    }

    fn asset_id(currency: &Currency) -> Result<&str, HandshakeError> {
        currency
            .id()
            .ok_or_else(|| HandshakeError::NoGateway(currency.display_name().to_string()))
    }

    fn url_for(
        &self,
        request: GatewayRequest<'_>,
        asset_id: &str,
        material: &HandshakeMaterial,
    ) -> Result<Url, HandshakeError> {
        let base = self.base_url_for(request.currency);
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| HandshakeError::InvalidUrl(base.to_string()))?
            .pop_if_empty()
            .extend(["v1", "forms", request.form.path()]);
        url.query_pairs_mut()
            .clear()
            .append_pair("Public-Key", &request.account.public_key().to_base58())
            .append_pair("Asset-Id", asset_id)
            .append_pair("Address", &request.account.address().to_base58())
            .append_pair("AuthHash", &material.auth_hash_base58())
            .append_pair("AuthNonce", &material.nonce_base58());
        Ok(url)
    }
}
