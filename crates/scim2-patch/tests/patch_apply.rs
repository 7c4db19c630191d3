//! End-to-end PATCH application against the core `User` resource.

use scim2_patch::{
    apply_patch_operation, classify, merge_replace, to_generic, MultiValuedAttribute, Name,
    PatchError, PatchOperation, PathKind, User, ENTERPRISE_USER_SCHEMA_URN,
};
use serde_json::json;

fn email(value: &str, type_: &str, primary: Option<bool>) -> MultiValuedAttribute {
    MultiValuedAttribute {
        value: Some(value.to_string()),
        type_: Some(type_.to_string()),
        primary,
        ..MultiValuedAttribute::default()
    }
}

fn sample_user() -> User {
    let mut user = User::new("jdoe");
    user.id = Some("2819c223".to_string());
    user.display_name = Some("Jo Doe".to_string());
    user.name = Some(Name {
        given_name: Some("Jo".to_string()),
        family_name: Some("Doe".to_string()),
        ..Name::default()
    });
    user.emails = Some(vec![
        email("jo@work.example", "work", Some(true)),
        email("jo@home.example", "home", None),
        email("jo@other.example", "work", None),
    ]);
    user
}

// ── Plain paths ────────────────────────────────────────────────────────────

#[test]
fn replace_with_empty_path_is_a_faithful_merge_pass_through() {
    let user = sample_user();
    let value = json!({"displayName": "New Name", "title": "Engineer"});
    let op = PatchOperation::replace(None, value.clone());

    let patched = apply_patch_operation(&user, &op).unwrap();

    // The engine must equal the merge helper applied to the deserialized value.
    let alter: User = serde_json::from_value(value).unwrap();
    let expected = merge_replace(&to_generic(&alter).unwrap(), &to_generic(&user).unwrap());
    assert_eq!(to_generic(&patched).unwrap(), expected);
    assert_eq!(patched.display_name.as_deref(), Some("New Name"));
    assert_eq!(patched.title.as_deref(), Some("Engineer"));
}

#[test]
fn add_with_empty_path_is_a_faithful_merge_pass_through() {
    let user = sample_user();
    let op = PatchOperation::add(None, json!({"nickName": "jojo"}));
    let patched = apply_patch_operation(&user, &op).unwrap();
    assert_eq!(patched.nick_name.as_deref(), Some("jojo"));
    assert_eq!(patched.user_name, user.user_name);
}

#[test]
fn replace_nested_plain_path() {
    let user = sample_user();
    let op = PatchOperation::replace("name.givenName".to_string(), json!("Joanna"));
    let patched = apply_patch_operation(&user, &op).unwrap();
    let name = patched.name.unwrap();
    assert_eq!(name.given_name.as_deref(), Some("Joanna"));
    // sibling sub-attribute untouched
    assert_eq!(name.family_name.as_deref(), Some("Doe"));
}

#[test]
fn add_appends_to_a_multi_valued_attribute() {
    let user = sample_user();
    let op = PatchOperation::add(
        "emails".to_string(),
        json!([{"value": "jo@new.example", "type": "other"}]),
    );
    let patched = apply_patch_operation(&user, &op).unwrap();
    let emails = patched.emails.unwrap();
    assert_eq!(emails.len(), 4);
    assert_eq!(emails[3].value.as_deref(), Some("jo@new.example"));
}

#[test]
fn remove_plain_path_clears_only_that_attribute() {
    let user = sample_user();
    let op = PatchOperation::remove("displayName");
    let patched = apply_patch_operation(&user, &op).unwrap();
    assert_eq!(patched.display_name, None);

    // nothing else changed
    let mut expected = user.clone();
    expected.display_name = None;
    assert_eq!(patched, expected);
}

#[test]
fn remove_without_path_is_rejected() {
    let user = sample_user();
    let op = PatchOperation {
        op: scim2_patch::PatchOperationType::Remove,
        path: None,
        value: None,
    };
    assert!(matches!(
        apply_patch_operation(&user, &op),
        Err(PatchError::InvalidPath(_)),
    ));
}

#[test]
fn scalar_value_without_path_is_not_parseable() {
    let user = sample_user();
    let op = PatchOperation::replace(None, json!("just a string"));
    assert!(matches!(
        apply_patch_operation(&user, &op),
        Err(PatchError::ValueNotParseable),
    ));
}

#[test]
fn replace_of_an_unknown_plain_path_is_rejected() {
    let user = sample_user();
    let op = PatchOperation::replace("favoriteColor".to_string(), json!("red"));
    assert!(matches!(
        apply_patch_operation(&user, &op),
        Err(PatchError::UnrecognizedAttribute(_)),
    ));
}

#[test]
fn add_with_a_bracketed_path_is_treated_as_plain_and_rejected() {
    // value filters never apply to add; the literal bracketed text is not
    // a declared attribute and must not leak into the extension map
    let user = sample_user();
    let op = PatchOperation::add("emails[type eq \"work\"]".to_string(), json!("x"));
    assert!(matches!(
        apply_patch_operation(&user, &op),
        Err(PatchError::UnrecognizedAttribute(_)),
    ));
}

#[test]
fn whole_resource_value_with_unknown_attribute_is_rejected() {
    let user = sample_user();
    let op = PatchOperation::add(None, json!({"favoriteColor": "red"}));
    assert!(matches!(
        apply_patch_operation(&user, &op),
        Err(PatchError::UnrecognizedAttribute(_)),
    ));
}

#[test]
fn untouched_attributes_survive_the_generic_round_trip() {
    let user = sample_user();
    let op = PatchOperation::replace("addresses.streetAddress".to_string(), json!("1 Main St"));
    let patched = apply_patch_operation(&user, &op).unwrap();

    let addresses = patched.addresses.unwrap();
    assert_eq!(addresses[0].street_address.as_deref(), Some("1 Main St"));
    assert_eq!(patched.emails, user.emails);
    assert_eq!(patched.name, user.name);
    assert_eq!(patched.id, user.id);
}

#[test]
fn extension_attribute_patch_by_urn_path() {
    let user = sample_user();
    let path = format!("{ENTERPRISE_USER_SCHEMA_URN}:department");
    let op = PatchOperation::replace(path, json!("Engineering"));
    let patched = apply_patch_operation(&user, &op).unwrap();
    assert_eq!(
        patched.extended.get(ENTERPRISE_USER_SCHEMA_URN),
        Some(&json!({"department": "Engineering"})),
    );
}

// ── Path classification ────────────────────────────────────────────────────

#[test]
fn classification_of_the_canonical_path_forms() {
    assert_eq!(classify("name.givenName").unwrap(), PathKind::Plain);

    match classify("emails[type eq \"work\"]").unwrap() {
        PathKind::Filtered(f) => {
            assert_eq!(f.attribute, "emails");
            assert_eq!(f.filter, "type eq \"work\"");
            assert_eq!(f.sub_attribute, None);
        }
        other => panic!("expected filtered, got {other:?}"),
    }

    match classify("ims[value eq \"hi\"].primary").unwrap() {
        PathKind::Filtered(f) => {
            assert_eq!(f.attribute, "ims");
            assert_eq!(f.filter, "value eq \"hi\"");
            assert_eq!(f.sub_attribute.as_deref(), Some("primary"));
        }
        other => panic!("expected filtered, got {other:?}"),
    }

    match classify("addresses[value co \"any[...]thing\"]").unwrap() {
        PathKind::Filtered(f) => assert_eq!(f.filter, "value co \"any[...]thing\""),
        other => panic!("expected filtered, got {other:?}"),
    }
}

// ── Value-selection filters ────────────────────────────────────────────────

#[test]
fn filtered_remove_deletes_matching_entries_without_index_corruption() {
    // entries 0 and 2 match; descending processing must leave entry 1 intact
    let user = sample_user();
    let op = PatchOperation::remove("emails[type eq \"work\"]");
    let patched = apply_patch_operation(&user, &op).unwrap();

    let emails = patched.emails.unwrap();
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0].value.as_deref(), Some("jo@home.example"));
    assert_eq!(emails[0].type_.as_deref(), Some("home"));
}

#[test]
fn filtered_remove_of_every_entry_clears_the_attribute() {
    let mut user = sample_user();
    user.emails = Some(vec![email("jo@work.example", "work", None)]);
    let op = PatchOperation::remove("emails[type eq \"work\"]");
    let patched = apply_patch_operation(&user, &op).unwrap();
    assert_eq!(patched.emails, None);
}

#[test]
fn filtered_remove_of_a_sub_attribute_keeps_the_entry() {
    let user = sample_user();
    let op = PatchOperation::remove("emails[value eq \"jo@work.example\"].type");
    let patched = apply_patch_operation(&user, &op).unwrap();

    let emails = patched.emails.unwrap();
    assert_eq!(emails.len(), 3);
    assert_eq!(emails[0].value.as_deref(), Some("jo@work.example"));
    assert_eq!(emails[0].type_, None);
    assert_eq!(emails[1].type_.as_deref(), Some("home"));
}

#[test]
fn filtered_replace_of_a_sub_attribute() {
    let user = sample_user();
    let op = PatchOperation::replace(
        "emails[type eq \"home\"].value".to_string(),
        json!("jo@new-home.example"),
    );
    let patched = apply_patch_operation(&user, &op).unwrap();
    let emails = patched.emails.unwrap();
    assert_eq!(emails[1].value.as_deref(), Some("jo@new-home.example"));
    assert_eq!(emails[0].value.as_deref(), Some("jo@work.example"));
}

#[test]
fn filtered_replace_of_whole_entries() {
    let user = sample_user();
    let op = PatchOperation::replace(
        "emails[type eq \"work\"]".to_string(),
        json!({"value": "bulk@example.com", "type": "work"}),
    );
    let patched = apply_patch_operation(&user, &op).unwrap();
    let emails = patched.emails.unwrap();
    assert_eq!(emails[0].value.as_deref(), Some("bulk@example.com"));
    assert_eq!(emails[2].value.as_deref(), Some("bulk@example.com"));
    assert_eq!(emails[1].value.as_deref(), Some("jo@home.example"));
}

#[test]
fn zero_match_filtered_patch_is_a_silent_no_op() {
    let user = sample_user();
    let op = PatchOperation::remove("emails[type eq \"missing\"]");
    let patched = apply_patch_operation(&user, &op).unwrap();
    assert_eq!(patched, user);
}

#[test]
fn filtered_patch_on_absent_list_is_a_silent_no_op() {
    let mut user = sample_user();
    user.emails = None;
    let op = PatchOperation::remove("emails[type eq \"work\"]");
    let patched = apply_patch_operation(&user, &op).unwrap();
    assert_eq!(patched, user);
}

#[test]
fn filtered_path_on_a_simple_attribute_is_rejected() {
    let user = sample_user();
    let op = PatchOperation::remove("displayName[type eq \"x\"]");
    assert!(matches!(
        apply_patch_operation(&user, &op),
        Err(PatchError::NotMultivaluedComplex(_)),
    ));
}

#[test]
fn filtered_path_on_an_unknown_attribute_is_rejected() {
    let user = sample_user();
    let op = PatchOperation::remove("badges[type eq \"x\"]");
    assert!(matches!(
        apply_patch_operation(&user, &op),
        Err(PatchError::UnrecognizedAttribute(_)),
    ));
}

#[test]
fn malformed_filter_text_is_rejected() {
    let user = sample_user();
    let op = PatchOperation::remove("emails[type eq]");
    assert!(matches!(
        apply_patch_operation(&user, &op),
        Err(PatchError::FilterSyntax(_)),
    ));
}

#[test]
fn malformed_bracket_syntax_is_rejected() {
    let user = sample_user();
    let op = PatchOperation::remove("emails[type eq \"x\"]trailing");
    assert!(matches!(
        apply_patch_operation(&user, &op),
        Err(PatchError::InvalidPath(_)),
    ));
}

#[test]
fn urn_qualified_filter_attribute_matches_after_preprocess() {
    let user = sample_user();
    let path =
        "emails[urn:ietf:params:scim:schemas:core:2.0:User:type eq \"home\"].display".to_string();
    let op = PatchOperation::replace(path, json!("Home inbox"));
    let patched = apply_patch_operation(&user, &op).unwrap();
    assert_eq!(patched.emails.unwrap()[1].display.as_deref(), Some("Home inbox"));
}

// ── Wire-format operations ─────────────────────────────────────────────────

#[test]
fn operations_parsed_from_wire_json_apply_cleanly() {
    let user = sample_user();
    let ops: Vec<PatchOperation> = serde_json::from_value(json!([
        {"op": "Replace", "path": "displayName", "value": "Wire Name"},
        {"op": "remove", "path": "emails[type eq \"work\"]"},
        {"op": "ADD", "value": {"locale": "en-US"}}
    ]))
    .unwrap();

    let mut patched = user;
    for op in &ops {
        patched = apply_patch_operation(&patched, op).unwrap();
    }
    assert_eq!(patched.display_name.as_deref(), Some("Wire Name"));
    assert_eq!(patched.emails.as_ref().unwrap().len(), 1);
    assert_eq!(patched.locale.as_deref(), Some("en-US"));
}

#[test]
fn generic_map_round_trip_preserves_nested_values() {
    // build -> deserialize -> re-extract yields the original value
    let map = scim2_patch::build_generic_map(
        "addresses.streetAddress",
        &json!("100 Universal City Plaza"),
        scim2_patch::user_schema(),
    )
    .unwrap();
    let user: User = scim2_patch::from_generic(map).unwrap();
    let extracted = to_generic(&user).unwrap();
    assert_eq!(
        extracted["addresses"][0]["streetAddress"],
        json!("100 Universal City Plaza"),
    );
}
