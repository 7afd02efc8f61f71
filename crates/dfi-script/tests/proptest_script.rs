use proptest::prelude::*;

use dfi_script::{Address, AddressFormat, Network, Script};

/// Strategy for an ordered sequence of hex fragments, each decoding to at
/// most 255 bytes.
fn arb_fragments() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(any::<u8>(), 0..=255), 0..8)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Composition is deterministic and its length obeys
    /// sum(len(f) + (1 if len(f) > 1 else 0)) over the fragments.
    #[test]
    fn build_deterministic_with_exact_length(fragments in arb_fragments()) {
        let hex_parts: Vec<String> = fragments.iter().map(hex::encode).collect();
        let parts: Vec<&str> = hex_parts.iter().map(String::as_str).collect();

        let script = Script::build(&parts).unwrap();
        let again = Script::build(&parts).unwrap();
        prop_assert_eq!(&script, &again);

        let expected: usize = fragments
            .iter()
            .map(|f| f.len() + usize::from(f.len() > 1))
            .sum();
        prop_assert_eq!(script.len(), expected);
    }

    /// Fragments over 255 bytes are rejected, never truncated.
    #[test]
    fn build_rejects_oversized_fragment(extra in 1usize..64) {
        let big = hex::encode(vec![0u8; 255 + extra]);
        prop_assert!(Script::build(&[big.as_str()]).is_err());
    }

    /// Data outputs round-trip the payload and fail past 255 bytes.
    #[test]
    fn data_output_roundtrip(msg in prop::collection::vec(any::<u8>(), 0..=255)) {
        let script = Script::data_output(&msg).unwrap();
        prop_assert_eq!(script.len(), msg.len() + 2);
        prop_assert_eq!(&script.to_bytes()[2..], msg.as_slice());
        prop_assert!(script.is_data());
    }

    /// Every (format, network, hash) triple encodes to an address that
    /// decodes back to the same payload.
    #[test]
    fn address_roundtrip(
        hash in prop::array::uniform20(any::<u8>()),
        format_idx in 0usize..3,
        mainnet in any::<bool>(),
    ) {
        let format = [AddressFormat::P2pkh, AddressFormat::P2sh, AddressFormat::P2wpkh][format_idx];
        let network = if mainnet { Network::Mainnet } else { Network::Testnet };

        let encoded = Address::from_hash(format, network, &hash);
        let decoded = Address::decode(&encoded.address_string, network).unwrap();
        prop_assert_eq!(decoded.hash, hash);
        prop_assert_eq!(decoded.format, format);
        prop_assert_eq!(decoded.network, network);

        // The other network must reject it outright.
        let other = if mainnet { Network::Testnet } else { Network::Mainnet };
        prop_assert!(Address::decode(&encoded.address_string, other).is_err());
    }
}
