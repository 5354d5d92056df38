//! Response parsing and outcome classification.
//!
//! Parsing happens in two passes. A streaming pass with [`quick_xml::Reader`]
//! rejects anything that is not a single well-formed UTF-8 document, then serde
//! extracts the status and transaction fields from the known layout:
//!
//! ```text
//! SecurePayMessage
//!   Status/{statusCode, statusDescription}
//!   Payment/TxnList/Txn/{approved, responseCode, responseText, txnID}
//! ```
//!
//! Elements outside that layout are ignored.

use quick_xml::{Reader, events::Event};
use serde::Deserialize;

use crate::{
    card::scrub_card_numbers,
    error::{Decline, GatewayError},
    models::PaymentResponse,
    protocol::ProtocolConstants,
};

/// Number of leading response bytes kept in
/// [`GatewayError::MalformedResponse`].
pub const EXCERPT_LIMIT: usize = 500;

/// Value of `approved` for an approved transaction. Anything else is a decline.
const APPROVED: &str = "Yes";

/// Transaction-level fields of a normally processed response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionResult {
    /// Gateway status code; always the normal code.
    pub status_code: String,
    /// Gateway status description.
    pub status_description: String,
    /// `true` only when `approved` was exactly `Yes`.
    pub approved: bool,
    /// Bank response code.
    pub response_code: String,
    /// Bank response text.
    pub response_text: String,
    /// Gateway transaction ID, when the gateway assigned one.
    pub transaction_id: Option<String>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(rename = "Status")]
    status: Option<StatusSection>,
    #[serde(rename = "Payment")]
    payment: Option<PaymentSection>,
}

#[derive(Deserialize)]
struct StatusSection {
    #[serde(rename = "statusCode")]
    status_code: Option<String>,
    #[serde(rename = "statusDescription")]
    status_description: Option<String>,
}

#[derive(Deserialize)]
struct PaymentSection {
    #[serde(rename = "TxnList")]
    txn_list: Option<TxnListSection>,
}

#[derive(Deserialize)]
struct TxnListSection {
    #[serde(rename = "Txn")]
    txn: Option<TxnSection>,
}

#[derive(Deserialize)]
struct TxnSection {
    approved: Option<String>,
    #[serde(rename = "responseCode")]
    response_code: Option<String>,
    #[serde(rename = "responseText")]
    response_text: Option<String>,
    #[serde(rename = "txnID")]
    txn_id: Option<String>,
}

/// Parses a gateway response body.
///
/// # Errors
///
/// - [`GatewayError::MalformedResponse`] if `body` is not a single well-formed
///   UTF-8 XML document. The excerpt holds at most [`EXCERPT_LIMIT`] bytes with
///   card numbers masked.
/// - [`GatewayError::Status`] if the status code is not
///   [`normal_status_code`](ProtocolConstants::normal_status_code).
/// - [`GatewayError::MissingField`] if `statusCode`, `approved`,
///   `responseCode` or `responseText` is absent. A missing
///   `statusDescription` reads as empty.
pub fn parse_response(
    constants: &ProtocolConstants,
    body: &[u8],
) -> Result<TransactionResult, GatewayError> {
    let text = std::str::from_utf8(body).map_err(|_| malformed(body))?;
    check_well_formed(text).ok_or_else(|| malformed(body))?;
    let message: ResponseMessage = quick_xml::de::from_str(text).map_err(|_| malformed(body))?;

    let status = message.status.ok_or(GatewayError::MissingField("statusCode"))?;
    let status_code = status.status_code.ok_or(GatewayError::MissingField("statusCode"))?;
    let status_description = status.status_description.unwrap_or_default();

    if status_code != constants.normal_status_code {
        return Err(GatewayError::Status { code: status_code, description: status_description });
    }

    let txn = message
        .payment
        .and_then(|payment| payment.txn_list)
        .and_then(|list| list.txn)
        .ok_or(GatewayError::MissingField("Txn"))?;

    Ok(TransactionResult {
        status_code,
        status_description,
        approved: txn.approved.ok_or(GatewayError::MissingField("approved"))? == APPROVED,
        response_code: txn.response_code.ok_or(GatewayError::MissingField("responseCode"))?,
        response_text: txn.response_text.ok_or(GatewayError::MissingField("responseText"))?,
        transaction_id: txn.txn_id.filter(|id| !id.is_empty()),
    })
}

/// Splits a parsed result into an approval or a decline.
///
/// # Errors
///
/// Returns the [`Decline`] carrying the bank's code and text when the
/// transaction was not approved.
pub fn classify(result: TransactionResult) -> Result<PaymentResponse, Decline> {
    if result.approved {
        Ok(PaymentResponse {
            approved: true,
            bank_response_code: result.response_code,
            bank_response_text: result.response_text,
            transaction_id: result.transaction_id,
        })
    } else {
        Err(Decline {
            response_code: result.response_code,
            response_text: result.response_text,
            transaction_id: result.transaction_id,
        })
    }
}

/// Leading bytes of `body`, lossily decoded with card numbers masked.
///
/// The result never exceeds [`EXCERPT_LIMIT`] bytes. A character split by the
/// cut is dropped.
#[must_use]
pub fn excerpt(body: &[u8]) -> String {
    let mut head = body.get(..EXCERPT_LIMIT).unwrap_or(body);
    if let Err(e) = std::str::from_utf8(head)
        && e.error_len().is_none()
    {
        head = &head[..e.valid_up_to()];
    }

    let mut text = scrub_card_numbers(&String::from_utf8_lossy(head));
    if text.len() > EXCERPT_LIMIT {
        let mut end = EXCERPT_LIMIT;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        text.truncate(end);
    }
    text
}

fn malformed(body: &[u8]) -> GatewayError {
    GatewayError::MalformedResponse { excerpt: excerpt(body) }
}

/// Returns `Some(())` when `text` holds exactly one balanced root element and
/// nothing but whitespace, comments, processing instructions or a doctype
/// outside it.
fn check_well_formed(text: &str) -> Option<()> {
    let mut reader = Reader::from_str(text);
    let mut depth: usize = 0;
    let mut roots: usize = 0;

    loop {
        let event = reader.read_event().ok()?;
        match event {
            Event::Start(_) => {
                if depth == 0 {
                    roots += 1;
                }
                depth += 1;
            }
            Event::End(_) => {
                depth = depth.checked_sub(1)?;
            }
            Event::Empty(_) => {
                if depth == 0 {
                    roots += 1;
                }
            }
            Event::Text(ref content) if depth == 0 => {
                if !content.iter().all(u8::is_ascii_whitespace) {
                    return None;
                }
            }
            Event::CData(_) if depth == 0 => return None,
            Event::Eof => break,
            _ => {}
        }
    }

    (depth == 0 && roots == 1).then_some(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status_code: &str, txn: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<SecurePayMessage>
  <MessageInfo>
    <messageID>8af793f9af34bea0cf40f5fb750f64</messageID>
    <messageTimestamp>20120101000000000000+000</messageTimestamp>
    <apiVersion>xml-4.2</apiVersion>
  </MessageInfo>
  <RequestType>Payment</RequestType>
  <MerchantInfo>
    <merchantID>ABC0001</merchantID>
  </MerchantInfo>
  <Status>
    <statusCode>{status_code}</statusCode>
    <statusDescription>Normal</statusDescription>
  </Status>
  <Payment>
    <TxnList count="1">
      <Txn ID="1">
        <txnType>0</txnType>
        <txnSource>23</txnSource>
        <amount>100</amount>
        <currency>AUD</currency>
        <purchaseOrderNo>1234</purchaseOrderNo>
        {txn}
        <settlementDate>20120102</settlementDate>
        <CreditCardInfo>
          <pan>444433...111</pan>
          <expiryDate>11/22</expiryDate>
          <cardType>6</cardType>
          <cardDescription>Visa</cardDescription>
        </CreditCardInfo>
      </Txn>
    </TxnList>
  </Payment>
</SecurePayMessage>
"#
        )
    }

    const APPROVED_TXN: &str = "<approved>Yes</approved>
        <responseCode>00</responseCode>
        <responseText>Approved</responseText>
        <txnID>009887</txnID>";

    const DECLINED_TXN: &str = "<approved>No</approved>
        <responseCode>51</responseCode>
        <responseText>Insufficient Funds</responseText>
        <txnID>009888</txnID>";

    fn parse(body: &str) -> Result<TransactionResult, GatewayError> {
        parse_response(&ProtocolConstants::default(), body.as_bytes())
    }

    #[test]
    fn test_parse_approved() {
        let result = parse(&response("000", APPROVED_TXN)).unwrap();
        assert!(result.approved);
        assert_eq!(result.status_code, "000");
        assert_eq!(result.status_description, "Normal");
        assert_eq!(result.response_code, "00");
        assert_eq!(result.response_text, "Approved");
        assert_eq!(result.transaction_id.as_deref(), Some("009887"));
    }

    #[test]
    fn test_parse_declined() {
        let result = parse(&response("000", DECLINED_TXN)).unwrap();
        assert!(!result.approved);
        assert_eq!(result.response_code, "51");
        assert_eq!(result.response_text, "Insufficient Funds");
    }

    #[test]
    fn test_approved_must_be_exactly_yes() {
        for value in ["yes", "YES", "true", "1", "Y"] {
            let txn = APPROVED_TXN
                .replace("<approved>Yes</approved>", &format!("<approved>{value}</approved>"));
            let result = parse(&response("000", &txn)).unwrap();
            assert!(!result.approved, "{value} must not count as approved");
        }
    }

    #[test]
    fn test_non_normal_status() {
        let body = "<SecurePayMessage><Status><statusCode>504</statusCode>\
                    <statusDescription>Invalid merchant ID</statusDescription></Status>\
                    </SecurePayMessage>";
        let err = parse(body).unwrap_err();
        assert!(matches!(
            &err,
            GatewayError::Status { code, description }
                if code == "504" && description == "Invalid merchant ID"
        ));
        assert_eq!(err.to_string(), "Payment gateway error 504: Invalid merchant ID.");
    }

    #[test]
    fn test_non_normal_status_ignores_txn_fields() {
        let err = parse(&response("575", APPROVED_TXN)).unwrap_err();
        assert!(matches!(err, GatewayError::Status { code, .. } if code == "575"));
    }

    #[test]
    fn test_custom_normal_status_code() {
        let constants =
            ProtocolConstants { normal_status_code: "001".to_owned(), ..Default::default() };
        let result =
            parse_response(&constants, response("001", APPROVED_TXN).as_bytes()).unwrap();
        assert!(result.approved);
        assert!(parse_response(&constants, response("000", APPROVED_TXN).as_bytes()).is_err());
    }

    #[test]
    fn test_garbage_is_malformed_with_excerpt() {
        let err = parse("this is not xml").unwrap_err();
        let GatewayError::MalformedResponse { excerpt } = &err else {
            panic!("expected malformed response, got {err:?}");
        };
        assert_eq!(excerpt, "this is not xml");
        assert!(err.to_string().contains("Here's the first 500 characters:\nthis is not xml"));
    }

    #[test]
    fn test_excerpt_truncated_to_limit() {
        let body = format!("<html>{}", "x".repeat(2000));
        let err = parse(&body).unwrap_err();
        let GatewayError::MalformedResponse { excerpt } = err else {
            panic!("expected malformed response");
        };
        assert_eq!(excerpt.len(), EXCERPT_LIMIT);
        assert!(excerpt.starts_with("<html>xxx"));
    }

    #[test]
    fn test_excerpt_drops_character_split_at_limit() {
        let mut body = "a".repeat(EXCERPT_LIMIT - 1).into_bytes();
        body.extend_from_slice("é".as_bytes());
        body.extend_from_slice("b".repeat(100).as_bytes());

        let excerpt = excerpt(&body);
        assert_eq!(excerpt.len(), EXCERPT_LIMIT - 1);
        assert!(excerpt.bytes().all(|b| b == b'a'));
    }

    #[test]
    fn test_excerpt_with_invalid_bytes_stays_within_limit() {
        let body = vec![0xFF; 2 * EXCERPT_LIMIT];
        let excerpt = excerpt(&body);
        assert!(excerpt.len() <= EXCERPT_LIMIT);
        assert!(excerpt.chars().all(|c| c == char::REPLACEMENT_CHARACTER));
    }

    #[test]
    fn test_unclosed_document_is_malformed() {
        let body = "<SecurePayMessage><Status><statusCode>000</statusCode>";
        assert!(matches!(parse(body), Err(GatewayError::MalformedResponse { .. })));
    }

    #[test]
    fn test_mismatched_tags_are_malformed() {
        let body = "<SecurePayMessage><Status></Payment></SecurePayMessage>";
        assert!(matches!(parse(body), Err(GatewayError::MalformedResponse { .. })));
    }

    #[test]
    fn test_multiple_roots_are_malformed() {
        let body = "<Status/><Status/>";
        assert!(matches!(parse(body), Err(GatewayError::MalformedResponse { .. })));
    }

    #[test]
    fn test_empty_body_is_malformed() {
        assert!(matches!(
            parse(""),
            Err(GatewayError::MalformedResponse { excerpt }) if excerpt.is_empty()
        ));
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let body = b"<SecurePayMessage>\xff\xfe</SecurePayMessage>";
        let err = parse_response(&ProtocolConstants::default(), body).unwrap_err();
        let GatewayError::MalformedResponse { excerpt } = err else {
            panic!("expected malformed response");
        };
        assert!(excerpt.starts_with("<SecurePayMessage>"));
        assert!(excerpt.contains('\u{FFFD}'));
    }

    #[test]
    fn test_excerpt_masks_card_numbers() {
        let body = "<error>card 4444333322221111 rejected";
        let GatewayError::MalformedResponse { excerpt } = parse(body).unwrap_err() else {
            panic!("expected malformed response");
        };
        assert!(!excerpt.contains("4444333322221111"));
        assert!(excerpt.contains("444433...111"));
    }

    #[test]
    fn test_missing_status() {
        let body = "<SecurePayMessage><RequestType>Payment</RequestType></SecurePayMessage>";
        assert!(matches!(parse(body), Err(GatewayError::MissingField("statusCode"))));
    }

    #[test]
    fn test_missing_txn() {
        let body = "<SecurePayMessage><Status><statusCode>000</statusCode>\
                    <statusDescription>Normal</statusDescription></Status></SecurePayMessage>";
        assert!(matches!(parse(body), Err(GatewayError::MissingField("Txn"))));
    }

    #[test]
    fn test_missing_response_text() {
        let txn = "<approved>No</approved><responseCode>51</responseCode>";
        assert!(matches!(
            parse(&response("000", txn)),
            Err(GatewayError::MissingField("responseText"))
        ));
    }

    #[test]
    fn test_missing_txn_id_is_allowed() {
        let txn = "<approved>No</approved><responseCode>05</responseCode>\
                   <responseText>Do Not Honour</responseText>";
        let result = parse(&response("000", txn)).unwrap();
        assert_eq!(result.transaction_id, None);
    }

    #[test]
    fn test_empty_txn_id_reads_as_absent() {
        for txn_id in ["<txnID/>", "<txnID></txnID>"] {
            let txn = format!(
                "<approved>No</approved><responseCode>05</responseCode>\
                 <responseText>Do Not Honour</responseText>{txn_id}"
            );
            let result = parse(&response("000", &txn)).unwrap();
            assert_eq!(result.transaction_id, None, "{txn_id}");
        }
    }

    #[test]
    fn test_classify_approved() {
        let result = parse(&response("000", APPROVED_TXN)).unwrap();
        let payment = classify(result).unwrap();
        assert_eq!(
            payment,
            PaymentResponse {
                approved: true,
                bank_response_code: "00".to_owned(),
                bank_response_text: "Approved".to_owned(),
                transaction_id: Some("009887".to_owned()),
            }
        );
    }

    #[test]
    fn test_classify_declined() {
        let result = parse(&response("000", DECLINED_TXN)).unwrap();
        let decline = classify(result).unwrap_err();
        assert_eq!(decline.response_code, "51");
        assert_eq!(decline.response_text, "Insufficient Funds");
        assert_eq!(decline.transaction_id.as_deref(), Some("009888"));
        assert_eq!(decline.to_string(), "your card was declined: Insufficient Funds");
    }
}
