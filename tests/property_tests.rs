//! Property-based tests for the value types.
//!
//! These tests use proptest to verify normalization and round-trip
//! invariants hold across randomly generated inputs.

use proptest::prelude::*;

use gitdomain::codec::{from_json, from_yaml, to_json, to_yaml};
use gitdomain::types::{
    CommitRangeSpec, FileChange, FileChangeKind, Hash, Ref, RefKind, RefName, Signature, TagName,
    Validate, WorktreeStatus,
};

/// Strategy for generating canonical hex hashes (SHA-1 or SHA-256 length).
fn valid_hash_string() -> impl Strategy<Value = String> {
    prop_oneof![Just(40usize), Just(64usize)].prop_flat_map(|len| {
        prop::collection::vec(
            prop::sample::select(vec![
                '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f',
            ]),
            len,
        )
        .prop_map(|chars| chars.into_iter().collect())
    })
}

/// Strategy for generating ref names from the allowed charset.
fn valid_ref_name() -> impl Strategy<Value = String> {
    "[A-Za-z0-9._/-]{1,80}"
}

/// Strategy for generating tag names, including the tag-only characters.
fn valid_tag_name() -> impl Strategy<Value = String> {
    "[A-Za-z0-9._/@{}^~:+-]{1,80}"
}

/// Strategy for generating relative repository paths.
fn valid_path() -> impl Strategy<Value = String> {
    "[a-z0-9_]{1,12}(/[a-z0-9_.]{1,12}){0,4}"
}

fn any_kind() -> impl Strategy<Value = FileChangeKind> {
    prop::sample::select(vec![
        FileChangeKind::Unknown,
        FileChangeKind::Added,
        FileChangeKind::Modified,
        FileChangeKind::Deleted,
        FileChangeKind::Renamed,
        FileChangeKind::Copied,
        FileChangeKind::TypeChanged,
    ])
}

proptest! {
    /// Parsing the rendered form of a hash yields the same hash.
    #[test]
    fn hash_parse_is_idempotent(hex in valid_hash_string()) {
        let hash = Hash::parse(&hex).unwrap();
        let again = Hash::parse(&hash.to_string()).unwrap();
        prop_assert_eq!(hash, again);
    }

    /// Mixed-case input is lowercased by parse but rejected by the strict constructor.
    #[test]
    fn hash_parse_lowercases(
        hex in valid_hash_string(),
        flips in prop::collection::vec(any::<bool>(), 64),
    ) {
        let mixed: String = hex
            .chars()
            .zip(flips.iter().cycle())
            .map(|(c, upper)| if *upper { c.to_ascii_uppercase() } else { c })
            .collect();
        let hash = Hash::parse(&mixed).unwrap();
        prop_assert_eq!(hash.as_str(), hex.as_str());
        prop_assert!(hash.validate().is_ok());

        if mixed != hex {
            prop_assert!(Hash::new(mixed).is_err());
        }
    }

    /// Surrounding whitespace is ignored by parse.
    #[test]
    fn hash_parse_trims(hex in valid_hash_string(), pad in "[ \t\n]{0,3}") {
        let padded = format!("{pad}{hex}{pad}");
        let parsed = Hash::parse(&padded).unwrap();
        prop_assert_eq!(parsed.as_str(), hex.as_str());
    }

    /// The short form is always a prefix of the full hash.
    #[test]
    fn hash_short_is_prefix(hex in valid_hash_string()) {
        let hash = Hash::new(hex.clone()).unwrap();
        prop_assert_eq!(hash.short().len(), 7);
        prop_assert!(hex.starts_with(hash.short()));
        prop_assert_eq!(hash.to_bytes().len(), hex.len() / 2);
    }

    /// Hash round-trips through JSON and YAML.
    #[test]
    fn hash_codec_roundtrip(hex in valid_hash_string()) {
        let hash = Hash::new(hex).unwrap();
        prop_assert_eq!(from_json::<Hash>(&to_json(&hash).unwrap()).unwrap(), hash.clone());
        prop_assert_eq!(from_yaml::<Hash>(&to_yaml(&hash).unwrap()).unwrap(), hash);
    }

    /// Any name from the charset is a valid ref name and round-trips.
    #[test]
    fn ref_name_roundtrip(name in valid_ref_name()) {
        let parsed = RefName::new(name.clone()).unwrap();
        prop_assert_eq!(parsed.as_str(), name.as_str());
        prop_assert_eq!(from_json::<RefName>(&to_json(&parsed).unwrap()).unwrap(), parsed.clone());
        prop_assert_eq!(from_yaml::<RefName>(&to_yaml(&parsed).unwrap()).unwrap(), parsed);
    }

    /// Any name from the tag charset is a valid tag name and round-trips.
    #[test]
    fn tag_name_roundtrip(name in valid_tag_name()) {
        let parsed = TagName::new(name).unwrap();
        prop_assert_eq!(from_json::<TagName>(&to_json(&parsed).unwrap()).unwrap(), parsed.clone());
        prop_assert_eq!(from_yaml::<TagName>(&to_yaml(&parsed).unwrap()).unwrap(), parsed);
    }

    /// Names longer than 256 characters are rejected.
    #[test]
    fn ref_name_length_bound(extra in 1usize..64) {
        let name = "a".repeat(256 + extra);
        prop_assert!(RefName::new(name).is_err());
        prop_assert!(RefName::new("a".repeat(256)).is_ok());
    }

    /// Branch refs built by the constructor always validate and round-trip.
    #[test]
    fn branch_ref_roundtrip(branch in "[a-z][a-z0-9_-]{0,30}", hex in valid_hash_string()) {
        let r = Ref::branch(&branch, Hash::new(hex).unwrap()).unwrap();
        prop_assert_eq!(r.kind, RefKind::Branch);
        prop_assert_eq!(from_json::<Ref>(&to_json(&r).unwrap()).unwrap(), r.clone());
        prop_assert_eq!(from_yaml::<Ref>(&to_yaml(&r).unwrap()).unwrap(), r);
    }

    /// Inferred kinds never conflict with the name they were inferred from.
    #[test]
    fn inferred_kind_validates(name in valid_ref_name(), hex in valid_hash_string()) {
        let name = RefName::new(name).unwrap();
        let kind = RefKind::infer(&name);
        prop_assert!(Ref::new(name, kind, Hash::new(hex).unwrap()).is_ok());
    }

    /// `from..to` specs render back to the same text.
    #[test]
    fn range_spec_display_roundtrip(from in "[a-z0-9_-]{1,20}", to in "[a-z0-9_-]{1,20}") {
        let text = format!("{from}..{to}");
        let spec = CommitRangeSpec::parse(&text).unwrap();
        prop_assert_eq!(spec.to_string(), text);
        prop_assert_eq!(CommitRangeSpec::parse(&spec.to_string()).unwrap(), spec);
    }

    /// File changes of any kind round-trip, with old_path only when allowed.
    #[test]
    fn file_change_roundtrip(path in valid_path(), old in valid_path(), kind in any_kind()) {
        let old_path = if kind.has_source() { old } else { String::new() };
        let change = FileChange::new(path, old_path, kind).unwrap();
        let json = to_json(&change).unwrap();
        prop_assert_eq!(from_json::<FileChange>(&json).unwrap(), change.clone());
        prop_assert_eq!(from_yaml::<FileChange>(&to_yaml(&change).unwrap()).unwrap(), change);
    }

    /// Status letters map back to the kind that produced them.
    #[test]
    fn status_letter_roundtrip(kind in any_kind()) {
        prop_assert_eq!(FileChangeKind::from_status_letter(kind.status_letter()).unwrap(), kind);
    }

    /// Signatures keep their instant and offset across encodings.
    #[test]
    fn signature_roundtrip(
        name in "[A-Za-z][A-Za-z .'-]{0,40}[A-Za-z]",
        local in "[a-z0-9]{1,12}",
        secs in 0i64..4_000_000_000,
        offset_minutes in -720i32..=840,
    ) {
        let line = format!(
            "{name} <{local}@example.com> {secs} {}{:02}{:02}",
            if offset_minutes < 0 { '-' } else { '+' },
            offset_minutes.abs() / 60,
            offset_minutes.abs() % 60,
        );
        let sig = Signature::parse_ident(&line).unwrap();
        prop_assert_eq!(sig.when.unwrap().timestamp(), secs);
        prop_assert_eq!(from_json::<Signature>(&to_json(&sig).unwrap()).unwrap(), sig.clone());
        prop_assert_eq!(from_yaml::<Signature>(&to_yaml(&sig).unwrap()).unwrap(), sig);
    }

    /// Every combination of worktree flags is valid and round-trips.
    #[test]
    fn worktree_status_roundtrip(unstaged: bool, staged: bool, untracked: bool) {
        let status = WorktreeStatus {
            has_unstaged: unstaged,
            has_staged: staged,
            has_untracked: untracked,
        };
        prop_assert!(status.validate().is_ok());
        prop_assert_eq!(status.is_clean(), !unstaged && !staged && !untracked);
        prop_assert_eq!(from_json::<WorktreeStatus>(&to_json(&status).unwrap()).unwrap(), status);
        prop_assert_eq!(from_yaml::<WorktreeStatus>(&to_yaml(&status).unwrap()).unwrap(), status);
    }
}
