//! Universal invariants from the reference property table, exercised as
//! proptest round-trips plus a few fixed-example checks.

use cake_core::cake::{Cake, CakeType};
use cake_core::content_address::ContentAddress;
use cake_core::rack::{CakeRack, PatchAction};
use cake_core::resolver::{resolve, PortalResolver};
use cake_core::salted_sha::SaltedSha;
use cake_common::{is_it_shard, shard_name, shard_num, MAX_SHARDS};
use proptest::prelude::*;
use sha2::{Digest, Sha256};

proptest! {
    #[test]
    fn invariant_1_cake_round_trip(bytes: Vec<u8>) {
        let cake = Cake::from_bytes(&bytes);
        let parsed = Cake::parse(&cake.to_string()).unwrap();
        prop_assert_eq!(cake, parsed);
    }

    #[test]
    fn invariant_4_digest_agreement(bytes: Vec<u8>) {
        let cake = Cake::from_bytes(&bytes);
        let expected: [u8; 32] = Sha256::digest(&bytes).into();
        prop_assert_eq!(cake.digest(), expected);
    }

    #[test]
    fn invariant_5_shard_always_in_range(a: u8, b: u8) {
        let s = shard_num(&[a, b], MAX_SHARDS);
        prop_assert!(s < MAX_SHARDS);
        prop_assert!(is_it_shard(&shard_name(&[a, b], MAX_SHARDS), MAX_SHARDS));
    }

    #[test]
    fn invariant_6_content_address_round_trip(hash: [u8; 32]) {
        let addr = ContentAddress::from_hash(hash);
        let parsed = ContentAddress::from_hash(*addr.hash_bytes());
        prop_assert_eq!(*parsed.hash_bytes(), hash);
        let reparsed = ContentAddress::parse(addr.id()).unwrap();
        prop_assert_eq!(*reparsed.hash_bytes(), hash);
    }

    #[test]
    fn invariant_10_salted_sha_accepts_own_secret_rejects_others(secret: String, other: String) {
        prop_assume!(secret != other);
        let salted = SaltedSha::from_secret(&secret);
        prop_assert!(salted.check_secret(&secret));
        prop_assert!(!salted.check_secret(&other));
        let round_tripped = SaltedSha::parse(&salted.to_canonical_string()).unwrap();
        prop_assert!(round_tripped.check_secret(&secret));
    }
}

#[test]
fn invariant_3_inline_boundary_at_32_and_33_bytes() {
    let at_32 = Cake::from_bytes(&vec![5u8; 32]);
    assert_eq!(at_32.cake_type(), CakeType::Inline);
    assert_eq!(at_32.data(), Some(&vec![5u8; 32][..]));

    let at_33 = Cake::from_bytes(&vec![5u8; 33]);
    assert_eq!(at_33.cake_type(), CakeType::Sha256);
    assert!(!at_33.has_data());
}

#[test]
fn invariant_2_equality_follows_digest_for_same_type_and_role() {
    let a = Cake::from_bytes(&vec![1u8; 40]);
    let b = Cake::from_bytes(&vec![1u8; 40]);
    assert_eq!(a, b);
    assert_eq!(a.digest(), b.digest());

    let different = Cake::from_bytes(&vec![2u8; 40]);
    assert_ne!(a, different);
}

#[test]
fn invariant_7_rack_self_address_stable_under_reserialization() {
    let mut rack = CakeRack::new();
    rack.insert("x", Some(Cake::from_bytes(b"one")));
    rack.insert("y", Some(Cake::from_bytes(b"two")));
    let cake_before = rack.cake();

    let reparsed = CakeRack::parse(&rack.to_json()).unwrap();
    assert_eq!(reparsed.cake(), cake_before);
}

#[test]
fn invariant_8_merge_patches_applied_to_prev_equal_new() {
    let prev = CakeRack::from_pairs([
        ("a".to_string(), Some(Cake::from_bytes(b"1"))),
        ("b".to_string(), Some(Cake::from_bytes(b"2"))),
        ("c".to_string(), None),
    ]);
    let new = CakeRack::from_pairs([
        ("b".to_string(), Some(Cake::from_bytes(b"2-changed"))),
        ("c".to_string(), Some(Cake::from_bytes(b"3"))),
        ("d".to_string(), Some(Cake::from_bytes(b"4"))),
    ]);

    let patches = new.merge(&prev);
    let mut rebuilt = CakeRack::from_pairs(
        prev_entries(&prev)
    );
    for patch in patches {
        match patch.action {
            PatchAction::Delete => {
                rebuilt.remove(&patch.name);
            }
            PatchAction::Update => {
                rebuilt.insert(patch.name, patch.cake);
            }
        }
    }
    assert_eq!(rebuilt.to_json(), new.to_json());
}

fn prev_entries(rack: &CakeRack) -> Vec<(String, Option<Cake>)> {
    rack.names()
        .map(|name| (name.to_string(), rack.get(name).unwrap().clone()))
        .collect()
}

#[test]
fn invariant_9_path_absolutization() {
    use cake_core::path::CakePath;

    let root = Cake::from_bytes(b"root");
    let base = CakePath::absolute(root.clone(), vec!["base".into()]);

    let abs = CakePath::absolute(Cake::from_bytes(b"other root"), vec!["z".into()]);
    assert_eq!(abs.make_absolute(&base), abs);

    let rel = CakePath::relative(vec!["leaf".into()]);
    let made = rel.make_absolute(&base);
    assert_eq!(made.to_string(), format!("/{root}/base/leaf"));
}

struct NoOpResolver;
impl PortalResolver for NoOpResolver {
    fn resolve_one(&self, _portal: &Cake) -> Result<Cake, cake_core::errors::CakeError> {
        unreachable!("immutable cakes never reach the lookup")
    }
}

#[test]
fn resolution_stops_immediately_for_immutable_cakes() {
    let cake = Cake::from_bytes(b"already immutable");
    let resolved = resolve(cake.clone(), &NoOpResolver).unwrap();
    assert_eq!(resolved, cake);
}

#[test]
fn shard_num_one_byte_inline_fallback_is_not_modded() {
    let cake = Cake::from_bytes(&[250]);
    assert_eq!(cake.shard_num(MAX_SHARDS), 250);
}

#[test]
fn shard_num_empty_inline_fallback_is_zero() {
    let cake = Cake::from_bytes(b"");
    assert_eq!(cake.cake_type(), CakeType::Inline);
    assert_eq!(cake.shard_num(MAX_SHARDS), 0);
    assert_eq!(&cake.digest()[..], Sha256::digest(b"").as_slice());
}
