//!
//! String-in, serde-out entry points
//!
//! These are the functions a JSON front end calls. Their inputs and outputs serialise with
//! camelCase field names
//!

use crate::{
    base,
    crypto::{self, Algorithm},
    header::{SIGNATURE, SIGNATURE_INPUT},
    input,
    message::Message,
    params::{Params, SignatureParams},
    signature, Error, Result,
};
use http::HeaderName;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use structured_fields::{BareItem, Key};
use tracing::{debug, instrument};

/// Parameter value in its JSON shape
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Boolean(bool),
    Decimal(f64),
    Integer(i64),
    String(String),
}

impl From<&BareItem> for ParamValue {
    fn from(value: &BareItem) -> Self {
        match value {
            BareItem::Boolean(boolean) => Self::Boolean(*boolean),
            BareItem::ByteSequence(bytes) => {
                Self::String(base64_simd::STANDARD.encode_to_string(bytes))
            }
            BareItem::Decimal(decimal) => Self::Decimal(decimal.as_f64()),
            BareItem::Integer(integer) => Self::Integer(integer.get()),
            BareItem::String(string) => Self::String(string.as_str().to_owned()),
            BareItem::Token(token) => Self::String(token.as_str().to_owned()),
        }
    }
}

/// Summary of a single `Signature-Input` entry
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureInputSummary {
    pub covered_content: Vec<String>,
    pub params: IndexMap<String, ParamValue>,
    pub value: String,
}

/// Request line of a parsed message
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSummary {
    pub request_target: String,
    pub method: String,
    pub path: String,

    /// Empty if the request target has no query
    pub query: String,
}

/// Status line of a parsed message
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSummary {
    pub status_code: u16,
}

/// Outcome of [`parse_message`]
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedSummary {
    /// Lowercased header names
    pub headers: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_input: Option<IndexMap<String, SignatureInputSummary>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<RequestSummary>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseSummary>,
}

/// Input of [`build_signature_base`]
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseRequest {
    #[serde(alias = "msg")]
    pub http_msg: String,
    pub covered_content: Vec<String>,
    pub created: Option<u64>,
    pub expires: Option<u64>,
    pub keyid: Option<String>,
    pub alg: Option<String>,
    pub nonce: Option<String>,
}

impl BaseRequest {
    /// Signature parameters in the fixed order `created`, `expires`, `keyid`, `alg`, `nonce`
    pub fn params(&self) -> Result<Params> {
        let mut builder = Params::builder();
        if let Some(created) = self.created {
            builder = builder.created(created);
        }
        if let Some(expires) = self.expires {
            builder = builder.expires(expires);
        }
        if let Some(ref keyid) = self.keyid {
            builder = builder.keyid(keyid);
        }
        if let Some(ref alg) = self.alg {
            builder = builder.alg(Algorithm::from_name(alg)?);
        }
        if let Some(ref nonce) = self.nonce {
            builder = builder.nonce(nonce);
        }

        Ok(builder.build()?)
    }
}

/// Outcome of [`build_signature_base`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseOutput {
    /// The signature base
    pub signature_input: String,

    /// Serialised signature parameters
    pub signature_params: String,
}

/// Input of [`sign_base`]
///
/// The raw message is accepted for envelope compatibility. Signing only looks at the base
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignRequest {
    #[serde(alias = "msg", default)]
    pub http_msg: String,
    pub signature_input: String,
    pub signature_params: String,
    pub signing_key: String,
    pub alg: String,
    pub label: String,
}

impl SignRequest {
    /// Sign the signature base
    pub fn sign(&self) -> Result<SignOutput> {
        sign_base(
            &self.signature_input,
            &self.signature_params,
            &self.signing_key,
            &self.alg,
            &self.label,
        )
    }
}

/// Outcome of [`sign_base`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignOutput {
    /// Base64 encoded signature
    pub signature_output: String,

    /// `Signature-Input` and `Signature` header block
    pub headers: String,
}

/// Input of [`verify`]
///
/// Absent headers are taken from the message itself
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    #[serde(alias = "msg")]
    pub http_msg: String,
    pub signature_input: Option<String>,
    pub signature: Option<String>,
    pub verification_key: String,
}

impl VerifyRequest {
    /// Run the verification
    pub fn verify(&self) -> Result<bool> {
        let message = Message::parse(self.http_msg.as_bytes())?;
        let header_value = |name: &HeaderName, supplied: Option<&String>| -> Result<String> {
            match supplied {
                Some(value) => Ok(value.clone()),
                None => message.header(name.as_str())?.ok_or(Error::NoSignatures),
            }
        };

        let signature_input = header_value(&SIGNATURE_INPUT, self.signature_input.as_ref())?;
        let signature = header_value(&SIGNATURE, self.signature.as_ref())?;
        let key = crypto::parse::public_key(&self.verification_key)?;

        signature::verify_message(&message, &signature_input, &signature, &key)
    }
}

/// Outcome of [`verify`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOutput {
    pub verified: bool,
}

/// Parse a raw HTTP message and summarise it
#[instrument(skip_all)]
pub fn parse_message(raw: &str) -> Result<ParsedSummary> {
    let message = Message::parse(raw.as_bytes())?;

    let signature_input = message
        .header(SIGNATURE_INPUT.as_str())?
        .map(|header| input::parse(&header))
        .transpose()?
        .map(|inputs| {
            inputs
                .into_iter()
                .map(|(label, input)| {
                    let summary = SignatureInputSummary {
                        covered_content: input
                            .params()
                            .covered_components()
                            .map(str::to_owned)
                            .collect(),
                        params: input
                            .params()
                            .params()
                            .iter()
                            .map(|(key, value)| (key.to_owned(), ParamValue::from(value)))
                            .collect(),
                        value: input.raw().to_owned(),
                    };
                    (label, summary)
                })
                .collect()
        });

    let request = message.method().map(|method| RequestSummary {
        request_target: message.request_target().unwrap_or_default(),
        method: method.as_str().to_uppercase(),
        path: message.path().unwrap_or_default().to_owned(),
        query: message.query().unwrap_or_default().to_owned(),
    });
    let response = message.status().map(|status| ResponseSummary {
        status_code: status.as_u16(),
    });

    Ok(ParsedSummary {
        headers: message.header_names().map(str::to_owned).collect(),
        signature_input,
        request,
        response,
    })
}

/// Construct the signature base of a raw HTTP message
#[instrument(skip_all)]
pub fn build_signature_base<I, S>(raw: &str, covered_content: I, params: Params) -> Result<BaseOutput>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let message = Message::parse(raw.as_bytes())?;
    let (base, signature_params) = base::construct(&message, covered_content, params)?.into_parts();

    Ok(BaseOutput {
        signature_input: base,
        signature_params: signature_params.to_string(),
    })
}

/// Sign a previously constructed signature base
///
/// Fails if `params` declares an algorithm other than `alg`. The key is dropped before returning
#[instrument(skip_all, fields(%alg, %label))]
pub fn sign_base(base: &str, params: &str, key_pem: &str, alg: &str, label: &str) -> Result<SignOutput> {
    let algorithm = Algorithm::from_name(alg)?;
    let label = label.parse::<Key>()?;
    let params = params.parse::<SignatureParams>()?;
    signature::ensure_algorithm(params.params(), algorithm)?;

    let key = crypto::parse::private_key(key_pem)?;
    let (signature, headers) = signature::sign_base(base, &params, &key, algorithm, &label)?;

    Ok(SignOutput {
        signature_output: base64_simd::STANDARD.encode_to_string(signature),
        headers: headers.to_string(),
    })
}

/// Verify every signature of a raw HTTP message
#[instrument(skip_all)]
pub fn verify(raw: &str, signature_input: &str, signature: &str, key_pem: &str) -> Result<bool> {
    let message = Message::parse(raw.as_bytes())?;
    let key = crypto::parse::public_key(key_pem)?;

    let verified = signature::verify_message(&message, signature_input, signature, &key)?;
    debug!(verified);

    Ok(verified)
}
