//! Serde model of the request document.
//!
//! Field order here is wire order. Attributes (`@`-prefixed) are declared
//! before child elements, as quick-xml requires. None of these types derive
//! `Debug`: they hold the raw card number and password.

use serde::Serialize;

#[derive(Serialize)]
pub(crate) struct SecurePayMessage<'a, T> {
    #[serde(rename = "MessageInfo")]
    pub message_info: MessageInfo<'a>,
    #[serde(rename = "MerchantInfo")]
    pub merchant_info: MerchantInfo<'a>,
    #[serde(rename = "RequestType")]
    pub request_type: &'a str,
    #[serde(rename = "Payment")]
    pub payment: PaymentSection<T>,
}

#[derive(Serialize)]
pub(crate) struct MessageInfo<'a> {
    /// Always empty; the gateway assigns message IDs.
    #[serde(rename = "messageID")]
    pub message_id: &'a str,
    #[serde(rename = "messageTimestamp")]
    pub message_timestamp: &'a str,
    #[serde(rename = "timeoutValue")]
    pub timeout_value: u32,
    #[serde(rename = "apiVersion")]
    pub api_version: &'a str,
}

#[derive(Serialize)]
pub(crate) struct MerchantInfo<'a> {
    #[serde(rename = "merchantID")]
    pub merchant_id: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub(crate) struct PaymentSection<T> {
    #[serde(rename = "TxnList")]
    pub txn_list: TxnList<T>,
}

#[derive(Serialize)]
pub(crate) struct TxnList<T> {
    #[serde(rename = "@count")]
    pub count: &'static str,
    #[serde(rename = "Txn")]
    pub txn: T,
}

#[derive(Serialize)]
pub(crate) struct PaymentTxn<'a> {
    #[serde(rename = "@ID")]
    pub id: &'static str,
    #[serde(rename = "txnType")]
    pub txn_type: &'a str,
    #[serde(rename = "txnSource")]
    pub txn_source: &'a str,
    pub amount: u64,
    pub currency: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurring: Option<&'static str>,
    #[serde(rename = "purchaseOrderNo")]
    pub purchase_order_no: &'a str,
    #[serde(rename = "CreditCardInfo")]
    pub credit_card_info: CreditCardInfo<'a>,
}

#[derive(Serialize)]
pub(crate) struct CreditCardInfo<'a> {
    #[serde(rename = "cardNumber")]
    pub card_number: &'a str,
    #[serde(rename = "expiryDate")]
    pub expiry_date: &'a str,
    #[serde(rename = "cardHolderName")]
    pub card_holder_name: &'a str,
}

#[derive(Serialize)]
pub(crate) struct RefundTxn<'a> {
    #[serde(rename = "@ID")]
    pub id: &'static str,
    #[serde(rename = "txnType")]
    pub txn_type: &'a str,
    #[serde(rename = "txnSource")]
    pub txn_source: &'a str,
    pub amount: u64,
    #[serde(rename = "purchaseOrderNo")]
    pub purchase_order_no: &'a str,
    #[serde(rename = "txnID")]
    pub txn_id: &'a str,
}
