//! Unit tests for the payload codec

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use durastate_domain::codec::{PayloadCodec, StateMessage, TypeRegistry};
    use durastate_domain::constants::ENVELOPE_MANIFEST;
    use durastate_domain::Error;
    use prost::Message;
    use prost_types::Any;

    use crate::messages::{Account, Nameless, Wallet, account};

    fn codec() -> PayloadCodec {
        PayloadCodec::new(
            TypeRegistry::new()
                .with::<Account>()
                .with::<Wallet>()
                .into_shared(),
        )
    }

    #[test]
    fn test_encode_uses_full_name_as_manifest() {
        let encoded = codec()
            .encode(&account("account-1", 500.0))
            .expect("encode");

        assert_eq!(encoded.manifest, "sample.Account");
        let envelope = Any::decode(encoded.payload.as_slice()).expect("envelope");
        assert_eq!(envelope.type_url, "type.googleapis.com/sample.Account");
        assert_eq!(
            Account::decode(envelope.value.as_slice()).expect("inner"),
            account("account-1", 500.0)
        );
    }

    #[test]
    fn test_decode_restores_concrete_type() {
        let codec = codec();
        let encoded = codec.encode(&account("account-1", 500.0)).expect("encode");

        let decoded = codec
            .decode(&encoded.manifest, &encoded.payload)
            .expect("decode");

        assert_eq!(decoded.manifest(), "sample.Account");
        assert_eq!(
            decoded.downcast_ref::<Account>(),
            Some(&account("account-1", 500.0))
        );
        assert!(decoded.downcast_ref::<Wallet>().is_none());
    }

    #[test]
    fn test_default_message_roundtrips_from_empty_inner_bytes() {
        let codec = codec();
        let encoded = codec.encode(&Wallet::default()).expect("encode");

        let decoded = codec
            .decode(&encoded.manifest, &encoded.payload)
            .expect("decode");

        assert_eq!(decoded.downcast_ref::<Wallet>(), Some(&Wallet::default()));
    }

    #[test]
    fn test_encode_without_type_name_fails() {
        let err = codec()
            .encode(&Nameless {
                value: "x".to_string(),
            })
            .unwrap_err();

        assert!(matches!(err, Error::Encoding { .. }));
        assert!(err.is_codec_error());
    }

    #[test]
    fn test_decode_unregistered_manifest() {
        let encoded = codec().encode(&account("a", 1.0)).expect("encode");
        let empty = PayloadCodec::new(Arc::new(TypeRegistry::new()));

        match empty.decode(&encoded.manifest, &encoded.payload) {
            Err(Error::UnknownType { manifest }) => assert_eq!(manifest, "sample.Account"),
            other => panic!("Expected UnknownType, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_type_checked_before_payload() {
        match codec().decode("sample.Missing", &[0xff, 0xff, 0xff]) {
            Err(Error::UnknownType { manifest }) => assert_eq!(manifest, "sample.Missing"),
            other => panic!("Expected UnknownType, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_corrupt_envelope() {
        let err = codec()
            .decode("sample.Account", &[0xff, 0xff, 0xff])
            .unwrap_err();

        assert!(matches!(err, Error::Decoding { .. }));
    }

    #[test]
    fn test_decode_manifest_mismatch_is_unpack_error() {
        let codec = codec();
        let encoded = codec.encode(&account("a", 1.0)).expect("encode");

        match codec.decode("sample.Wallet", &encoded.payload) {
            Err(Error::Unpack { manifest, message }) => {
                assert_eq!(manifest, "sample.Wallet");
                assert!(message.contains("sample.Account"));
            }
            other => panic!("Expected Unpack, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_corrupt_inner_message() {
        let envelope = Any {
            type_url: "type.googleapis.com/sample.Account".to_string(),
            value: vec![0x0a, 0x05, b'a'],
        };

        let err = codec()
            .decode("sample.Account", &envelope.encode_to_vec())
            .unwrap_err();

        assert!(matches!(err, Error::Decoding { .. }));
    }

    #[test]
    fn test_decode_envelope_manifest_resolves_from_type_url() {
        let codec = codec();
        let encoded = codec.encode(&account("legacy", 7.5)).expect("encode");

        let decoded = codec
            .decode(ENVELOPE_MANIFEST, &encoded.payload)
            .expect("decode");

        assert_eq!(
            decoded.downcast_ref::<Account>(),
            Some(&account("legacy", 7.5))
        );
    }

    #[test]
    fn test_decode_envelope_manifest_with_unregistered_inner_type() {
        let envelope = Any {
            type_url: "/sample.Missing".to_string(),
            value: Vec::new(),
        };

        match codec().decode(ENVELOPE_MANIFEST, &envelope.encode_to_vec()) {
            Err(Error::UnknownType { manifest }) => assert_eq!(manifest, "sample.Missing"),
            other => panic!("Expected UnknownType, got {other:?}"),
        }
    }

    #[test]
    fn test_state_message_type_url() {
        let message: &dyn StateMessage = &Wallet::default();
        assert_eq!(message.manifest(), "sample.Wallet");
        assert!(message.type_url().ends_with("/sample.Wallet"));
    }
}
