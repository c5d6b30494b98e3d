use as2_partnership::{ids, Change, PartnerDirectory, PartnerIdentity, PartyRole, ValidationError};
use proptest::prelude::*;

fn identity(name: &str, sender: &[(String, String)], receiver: &[(String, String)]) -> PartnerIdentity {
    let mut p = PartnerIdentity::new(name).unwrap();
    p.add_sender_ids(sender.iter().map(|(k, v)| (k.clone(), Some(v.clone())))).unwrap();
    p.add_receiver_ids(receiver.iter().map(|(k, v)| (k.clone(), Some(v.clone())))).unwrap();
    p
}

fn pairs(entries: &[(&str, &str)]) -> Vec<(String, String)> {
    entries
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

fn id_map() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::btree_map("[a-z_]{1,8}", "[A-Za-z0-9@.]{1,8}", 1..6)
        .prop_map(|m| m.into_iter().collect())
}

#[test]
fn template_with_sender_subset_matches_full_message() {
    let template = identity("acme-globex", &pairs(&[("as2_id", "ACME")]), &pairs(&[("as2_id", "GLOBEX")]));
    let message = identity(
        "incoming",
        &pairs(&[("as2_id", "ACME"), ("email", "edi@acme.example"), ("x509_alias", "acme")]),
        &pairs(&[("as2_id", "GLOBEX"), ("email", "as2@globex.example")]),
    );

    assert!(template.matches(&message));
    assert!(!message.matches(&template));
}

#[test]
fn unconfigured_identity_never_matches() {
    let unconfigured = PartnerIdentity::default();
    let message = identity("m", &pairs(&[("as2_id", "A")]), &pairs(&[("as2_id", "B")]));
    assert!(!unconfigured.matches(&message));
    assert!(!unconfigured.matches(&unconfigured));
}

#[test]
fn empty_key_is_invalid_argument_only_for_mutation() {
    let mut p = PartnerIdentity::default();
    let err = p.set_sender_id("", Some("x")).unwrap_err();
    assert!(matches!(err, ValidationError::EmptyKey { .. }));

    assert_eq!(p.sender_id(""), None);
    assert!(!p.contains_receiver_id(""));
    assert_eq!(p.attribute_or("", "fallback"), "fallback");
}

#[test]
fn set_none_then_contains_is_false() {
    let mut p = PartnerIdentity::default();
    p.set_attribute("k", Some("v")).unwrap();
    assert_eq!(p.set_attribute("k", None::<&str>).unwrap(), Change::Changed);
    assert!(!p.contains_attribute("k"));
}

#[test]
fn copy_from_twice_equals_once() {
    let mut source = identity("source", &pairs(&[("as2_id", "S")]), &pairs(&[("as2_id", "R")]));
    source.set_attribute("as2_url", Some("https://r.example/as2")).unwrap();

    let mut once = PartnerIdentity::default();
    once.copy_from(&source);
    let mut twice = PartnerIdentity::default();
    twice.copy_from(&source);
    twice.copy_from(&source);

    assert_eq!(once, twice);
    assert_eq!(once, source);
}

#[test]
fn directory_resolves_and_reports_missing_partner() {
    let mut directory = PartnerDirectory::new();
    directory
        .insert(identity("a-b", &pairs(&[("as2_id", "A")]), &pairs(&[("as2_id", "B")])))
        .unwrap();
    directory
        .insert(identity("a-c", &pairs(&[("as2_id", "A")]), &pairs(&[("as2_id", "C")])))
        .unwrap();

    let mut probe = PartnerIdentity::default();
    probe.set_sender_as2_id(Some("A"));
    probe.set_receiver_as2_id(Some("C"));
    assert_eq!(directory.resolve(&probe).unwrap().name(), "a-c");

    probe.set_receiver_as2_id(Some("D"));
    let err: as2_partnership::PartnershipError = directory.resolve(&probe).unwrap_err().into();
    assert!(err.is_not_found());
}

#[test]
fn rebind_leaves_shared_directory_entry_untouched() {
    let mut directory = PartnerDirectory::new();
    directory
        .insert(identity("a-b", &pairs(&[("as2_id", "A")]), &pairs(&[("as2_id", "B")])))
        .unwrap();

    let renamed = directory.get("a-b").unwrap().rebind("a-b-v2").unwrap();
    assert_eq!(renamed.name(), "a-b-v2");
    assert!(directory.get("a-b").is_some());
    assert!(directory.get("a-b-v2").is_none());
    assert_eq!(renamed.id(PartyRole::Sender, ids::AS2_ID), Some("A"));
}

proptest! {
    #[test]
    fn identity_with_both_sides_matches_itself(sender in id_map(), receiver in id_map()) {
        let p = identity("p", &sender, &receiver);
        prop_assert!(p.matches(&p));
    }

    #[test]
    fn extra_candidate_attributes_do_not_break_match(
        sender in id_map(),
        receiver in id_map(),
        extra in id_map(),
    ) {
        let template = identity("t", &sender, &receiver);
        let mut candidate = template.rebind("c").unwrap();
        for (k, v) in &extra {
            if !template.contains_sender_id(k) {
                candidate.set_sender_id(k, Some(v.clone())).unwrap();
            }
            if !template.contains_receiver_id(k) {
                candidate.set_receiver_id(k, Some(v.clone())).unwrap();
            }
        }
        prop_assert!(template.matches(&candidate));
    }

    #[test]
    fn changing_any_template_value_breaks_match(
        sender in id_map(),
        receiver in id_map(),
        pick in any::<prop::sample::Index>(),
        on_sender in any::<bool>(),
    ) {
        let template = identity("t", &sender, &receiver);
        let mut candidate = template.rebind("c").unwrap();
        let side = if on_sender { &sender } else { &receiver };
        let (key, value) = &side[pick.index(side.len())];
        let role = if on_sender { PartyRole::Sender } else { PartyRole::Receiver };
        candidate.set_id(role, key, Some(format!("{value}-changed"))).unwrap();
        prop_assert!(!template.matches(&candidate));
    }

    #[test]
    fn insertion_order_does_not_affect_match(sender in id_map(), receiver in id_map()) {
        let forward = identity("f", &sender, &receiver);
        let reversed_sender: Vec<_> = sender.iter().rev().cloned().collect();
        let reversed_receiver: Vec<_> = receiver.iter().rev().cloned().collect();
        let backward = identity("b", &reversed_sender, &reversed_receiver);

        prop_assert!(forward.matches(&backward));
        prop_assert!(backward.matches(&forward));
    }

    #[test]
    fn all_ids_copy_is_detached(sender in id_map(), receiver in id_map()) {
        let p = identity("p", &sender, &receiver);
        let mut copy = p.all_sender_ids();
        for (k, _) in &sender {
            copy.remove(k);
        }
        prop_assert!(copy.is_empty());
        prop_assert_eq!(p.sender_ids().len(), sender.len());
    }
}
