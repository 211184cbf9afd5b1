use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use frostline_domain::money::Money;

use crate::domain::repository::PaymentGatewayPort;
use crate::error::StoreServiceError;

/// Checkout gateway client. Order registration and signature verification are
/// pass-through REST calls authenticated with the merchant key pair.
#[derive(Clone)]
pub struct HttpPaymentGateway {
    client: reqwest::Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

impl HttpPaymentGateway {
    pub fn new(base_url: String, key_id: String, key_secret: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            key_id,
            key_secret,
        }
    }
}

#[derive(Serialize)]
struct CreateGatewayOrderBody<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
}

#[derive(Deserialize)]
struct CreateGatewayOrderResponse {
    id: String,
}

#[derive(Serialize)]
struct VerifyPaymentBody<'a> {
    order_id: &'a str,
    payment_id: &'a str,
    signature: &'a str,
}

#[derive(Deserialize)]
struct VerifyPaymentResponse {
    valid: bool,
}

impl PaymentGatewayPort for HttpPaymentGateway {
    async fn create_gateway_order(
        &self,
        amount: Money,
        receipt: &str,
    ) -> Result<String, StoreServiceError> {
        let response = self
            .client
            .post(format!("{}/v1/orders", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&CreateGatewayOrderBody {
                amount: amount.cents(),
                currency: "INR",
                receipt,
            })
            .send()
            .await
            .context("create gateway order")?;
        if !response.status().is_success() {
            return Err(
                anyhow::anyhow!("gateway order creation returned {}", response.status()).into(),
            );
        }
        let body: CreateGatewayOrderResponse = response
            .json()
            .await
            .context("decode gateway order response")?;
        Ok(body.id)
    }

    async fn verify_payment(
        &self,
        gateway_order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<bool, StoreServiceError> {
        let response = self
            .client
            .post(format!("{}/v1/payments/verify", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&VerifyPaymentBody {
                order_id: gateway_order_id,
                payment_id,
                signature,
            })
            .send()
            .await
            .context("verify payment signature")?;
        if !response.status().is_success() {
            return Err(
                anyhow::anyhow!("payment verification returned {}", response.status()).into(),
            );
        }
        let body: VerifyPaymentResponse = response
            .json()
            .await
            .context("decode payment verification response")?;
        Ok(body.valid)
    }
}
