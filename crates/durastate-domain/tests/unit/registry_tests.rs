//! Unit tests for the state type registry

#[cfg(test)]
mod tests {
    use durastate_domain::codec::TypeRegistry;

    use crate::messages::{Account, Wallet, account};

    #[test]
    fn test_empty_registry() {
        let registry = TypeRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.resolve("sample.Account").is_none());
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = TypeRegistry::new();
        registry.register::<Account>().register::<Wallet>();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("sample.Account"));
        assert_eq!(registry.manifests(), vec!["sample.Account", "sample.Wallet"]);
    }

    #[test]
    fn test_duplicate_registration_is_idempotent() {
        let registry = TypeRegistry::new().with::<Account>().with::<Account>();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_resolved_decoder_builds_message() {
        use prost::Message;

        let registry = TypeRegistry::new().with::<Account>();
        let decode = registry.resolve("sample.Account").expect("registered");

        let bytes = account("account-9", 12.0).encode_to_vec();
        let message = decode(&bytes).expect("decode");

        assert_eq!(
            message.downcast_ref::<Account>(),
            Some(&account("account-9", 12.0))
        );
    }

    #[test]
    fn test_debug_lists_manifests() {
        let registry = TypeRegistry::new().with::<Wallet>();
        assert!(format!("{registry:?}").contains("sample.Wallet"));
    }
}
