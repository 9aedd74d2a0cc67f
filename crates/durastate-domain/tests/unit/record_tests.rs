//! Unit tests for DurableState and DurableStateRecord

#[cfg(test)]
mod tests {
    use durastate_domain::codec::{PayloadCodec, TypeRegistry};
    use durastate_domain::value_objects::validate_persistence_id;
    use durastate_domain::{DurableState, DurableStateRecord, Error};

    use crate::messages::{Account, Wallet, account};

    fn codec() -> PayloadCodec {
        PayloadCodec::new(TypeRegistry::new().with::<Account>().into_shared())
    }

    #[test]
    fn test_record_carries_metadata_verbatim() {
        let state = DurableState::new(
            "account_1",
            42,
            account("account_1", 500.0),
            1_700_000_000,
            3,
        );

        let record = DurableStateRecord::from_state(&codec(), &state).expect("record");

        assert_eq!(record.persistence_id, "account_1");
        assert_eq!(record.version_number, 42);
        assert_eq!(record.timestamp, 1_700_000_000);
        assert_eq!(record.shard_number, 3);
        assert_eq!(record.state_manifest, "sample.Account");
        assert!(!record.state_payload.is_empty());
    }

    #[test]
    fn test_record_into_state() {
        let codec = codec();
        let state = DurableState::new(
            "account_1",
            2,
            account("account_1", 250.0),
            -5,
            u64::MAX,
        );
        let record = DurableStateRecord::from_state(&codec, &state).expect("record");

        let restored = record.into_state(&codec).expect("state");

        assert_eq!(restored.persistence_id, "account_1");
        assert_eq!(restored.version_number, 2);
        assert_eq!(restored.timestamp, -5);
        assert_eq!(restored.shard, u64::MAX);
        assert_eq!(
            restored.state_as::<Account>(),
            Some(&account("account_1", 250.0))
        );
        assert!(restored.state_as::<Wallet>().is_none());
    }

    #[test]
    fn test_empty_persistence_id_rejected() {
        let state = DurableState::new("", 1, account("x", 0.0), 0, 0);

        let err = DurableStateRecord::from_state(&codec(), &state).unwrap_err();

        assert!(matches!(err, Error::InvalidArgument { .. }));
    }

    #[test]
    fn test_validate_persistence_id() {
        assert!(validate_persistence_id("entity-1").is_ok());
        assert!(validate_persistence_id("").is_err());
    }

    #[test]
    fn test_manifest_of_state() {
        let state = DurableState::new("w", 1, Wallet::default(), 0, 0);
        assert_eq!(state.manifest(), "sample.Wallet");
    }
}
