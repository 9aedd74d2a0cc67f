//! Record <-> DynamoDB item mapping
//!
//! | Attribute | Type | Field |
//! |-----------|------|-------|
//! | `PersistenceID` | S (partition key) | persistence_id |
//! | `VersionNumber` | N | version_number |
//! | `StatePayload` | B | state_payload |
//! | `StateManifest` | S | state_manifest |
//! | `Timestamp` | N | timestamp |
//! | `ShardNumber` | N | shard_number |
//!
//! Numbers travel as decimal strings and are parsed with checked,
//! fixed-width parsing on the way back.

use std::collections::HashMap;
use std::str::FromStr;

use aws_sdk_dynamodb::primitives::Blob;
use aws_sdk_dynamodb::types::AttributeValue;
use durastate_domain::constants::{
    ATTR_PERSISTENCE_ID, ATTR_SHARD_NUMBER, ATTR_STATE_MANIFEST, ATTR_STATE_PAYLOAD,
    ATTR_TIMESTAMP, ATTR_VERSION_NUMBER,
};
use durastate_domain::error::{Error, Result};
use durastate_domain::value_objects::DurableStateRecord;

use crate::constants::BACKEND_DYNAMODB;

/// DynamoDB item attributes
pub type Item = HashMap<String, AttributeValue>;

/// Key attributes addressing one record
pub fn key_for(persistence_id: &str) -> Item {
    HashMap::from([(
        ATTR_PERSISTENCE_ID.to_string(),
        AttributeValue::S(persistence_id.to_string()),
    )])
}

/// Flatten a record into item attributes
pub fn record_to_item(record: &DurableStateRecord) -> Item {
    HashMap::from([
        (
            ATTR_PERSISTENCE_ID.to_string(),
            AttributeValue::S(record.persistence_id.clone()),
        ),
        (
            ATTR_VERSION_NUMBER.to_string(),
            AttributeValue::N(record.version_number.to_string()),
        ),
        (
            ATTR_STATE_PAYLOAD.to_string(),
            AttributeValue::B(Blob::new(record.state_payload.clone())),
        ),
        (
            ATTR_STATE_MANIFEST.to_string(),
            AttributeValue::S(record.state_manifest.clone()),
        ),
        (
            ATTR_TIMESTAMP.to_string(),
            AttributeValue::N(record.timestamp.to_string()),
        ),
        (
            ATTR_SHARD_NUMBER.to_string(),
            AttributeValue::N(record.shard_number.to_string()),
        ),
    ])
}

/// Rebuild a record from item attributes
///
/// # Errors
///
/// `BackendRead` when an attribute is missing, has the wrong type, or a
/// number does not fit its field.
pub fn item_to_record(persistence_id: &str, item: &Item) -> Result<DurableStateRecord> {
    let reader = ItemReader {
        persistence_id,
        item,
    };
    Ok(DurableStateRecord {
        persistence_id: reader.string(ATTR_PERSISTENCE_ID)?,
        version_number: reader.number(ATTR_VERSION_NUMBER)?,
        state_payload: reader.binary(ATTR_STATE_PAYLOAD)?,
        state_manifest: reader.string(ATTR_STATE_MANIFEST)?,
        timestamp: reader.number(ATTR_TIMESTAMP)?,
        shard_number: reader.number(ATTR_SHARD_NUMBER)?,
    })
}

struct ItemReader<'a> {
    persistence_id: &'a str,
    item: &'a Item,
}

impl ItemReader<'_> {
    fn error(&self, message: String) -> Error {
        Error::backend_read(BACKEND_DYNAMODB, self.persistence_id, message)
    }

    fn attribute(&self, name: &str) -> Result<&AttributeValue> {
        self.item
            .get(name)
            .ok_or_else(|| self.error(format!("missing attribute {name}")))
    }

    fn string(&self, name: &str) -> Result<String> {
        self.attribute(name)?
            .as_s()
            .cloned()
            .map_err(|_| self.error(format!("attribute {name} is not a string")))
    }

    fn binary(&self, name: &str) -> Result<Vec<u8>> {
        self.attribute(name)?
            .as_b()
            .map(|blob| blob.as_ref().to_vec())
            .map_err(|_| self.error(format!("attribute {name} is not binary")))
    }

    fn number<N>(&self, name: &str) -> Result<N>
    where
        N: FromStr,
        N::Err: std::fmt::Display,
    {
        let raw = self
            .attribute(name)?
            .as_n()
            .map_err(|_| self.error(format!("attribute {name} is not a number")))?;
        raw.parse::<N>()
            .map_err(|e| self.error(format!("attribute {name} value '{raw}' is out of range: {e}")))
    }
}
