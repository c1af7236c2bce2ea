use super::{directory, validator};

use argsig::analyser::lookup::{Channel, ChannelKind, Context, Directory, Member, Role, User};
use argsig::analyser::{AnalyserOptions, Criteria, Definition, Lookup, ValidationState, Validator, Value};
use async_trait::async_trait;
use rstest::rstest;

fn search(check_viewable: bool) -> AnalyserOptions {
    AnalyserOptions {
        search: true,
        check_viewable,
        ..AnalyserOptions::default()
    }
}

// ========================================
// Lookup-backed types
// ========================================

#[rstest]
#[case::by_name("admin")]
#[case::by_id("100")]
#[case::by_mention("<@&100>")]
#[tokio::test]
async fn role_is_resolved_through_lookup(#[case] token: &str, directory: Directory) {
    let (validator, _) = validator("<role:Role>", &[token], directory);
    let mut validator = validator.with_options(search(false));

    validator.validate().await;

    match validator.collected() {
        [Value::Role(role)] => assert_eq!(role.name, "Admin"),
        other => panic!("expected a role, got {other:?}"),
    }
}

#[rstest]
#[tokio::test]
async fn unknown_role_is_undiscoverable(directory: Directory) {
    let (validator, sink) = validator("<role:Role>", &["moderator"], directory);
    let mut validator = validator.with_options(search(false));

    validator.validate().await;

    assert!(matches!(
        validator.state(),
        ValidationState::Failed {
            kind: Criteria::Undiscoverable,
            position: 0,
            ..
        }
    ));
    let messages = sink.messages();
    assert_eq!(messages, vec!["Unable to find role moderator"]);
    assert!(messages[0].contains("moderator"));
}

#[rstest]
#[tokio::test]
async fn entity_types_are_ignored_without_search(directory: Directory) {
    let (mut validator, sink) = validator("<role:Role>", &["Admin"], directory);

    validator.validate().await;

    assert_eq!(validator.error().unwrap().kind, Criteria::Type);
    assert_eq!(
        sink.messages(),
        vec!["alice, your argument role did not match the proper type. Expected type Role but got Admin"]
    );
}

#[rstest]
#[case::mention("<@2>", "bob")]
#[case::name("BOB", "bob")]
#[tokio::test]
async fn user_is_resolved_from_guild_members(
    #[case] token: &str,
    #[case] expected: &str,
    directory: Directory,
) {
    let (validator, _) = validator("<who:User>", &[token], directory);
    let mut validator = validator.with_options(search(false));

    validator.validate().await;

    match validator.collected() {
        [Value::User(user)] => assert_eq!(user.username, expected),
        other => panic!("expected a user, got {other:?}"),
    }
}

#[rstest]
#[tokio::test]
async fn optional_user_falls_back_to_author(directory: Directory) {
    let (validator, sink) = validator("[who:User]", &["nobody"], directory);
    let mut validator = validator.with_options(search(false));

    validator.validate().await;

    match validator.collected() {
        [Value::User(user)] => assert_eq!(user.username, "alice"),
        other => panic!("expected the author, got {other:?}"),
    }
    assert!(sink.messages().is_empty());
}

#[rstest]
#[tokio::test]
async fn required_user_does_not_fall_back(directory: Directory) {
    let (validator, sink) = validator("<who:User>", &["nobody"], directory);
    let mut validator = validator.with_options(search(false));

    validator.validate().await;

    assert_eq!(validator.error().unwrap().kind, Criteria::Undiscoverable);
    assert_eq!(sink.messages(), vec!["Unable to find user nobody"]);
}

#[rstest]
#[case::visible("general", false, true)]
#[case::hidden_unchecked("staff", false, true)]
#[case::hidden_checked("staff", true, false)]
#[case::voice_checked("voice", true, false)]
#[case::mention_checked("<#10>", true, true)]
#[tokio::test]
async fn channel_visibility_is_enforced_when_enabled(
    #[case] token: &str,
    #[case] check_viewable: bool,
    #[case] usable: bool,
    directory: Directory,
) {
    let (validator, sink) = validator("<where:Channel>", &[token], directory);
    let mut validator = validator.with_options(search(check_viewable));

    validator.validate().await;

    assert_eq!(validator.is_usable(), usable);
    if usable {
        assert!(matches!(validator.collected(), [Value::Channel(_)]));
    } else {
        assert!(matches!(
            validator.state(),
            ValidationState::Failed {
                kind: Criteria::Unviewable,
                ..
            }
        ));
        assert_eq!(
            sink.messages(),
            vec!["alice, I can't view that channel. To do anything, my permissions must be modified to view that channel"]
        );
    }
}

#[rstest]
#[tokio::test]
async fn primitive_types_take_priority_over_lookups(directory: Directory) {
    let (validator, _) = validator("<id:number|who:User>", &["2"], directory);
    let mut validator = validator.with_options(search(false));

    validator.validate().await;

    assert_eq!(validator.collected(), &[Value::Number(2.0)]);
}

#[rstest]
#[tokio::test]
async fn later_entity_alternatives_are_tried_after_a_miss(directory: Directory) {
    let (validator, sink) = validator("<target:Role|member:User>", &["bob"], directory);
    let mut validator = validator.with_options(search(false));

    validator.validate().await;

    // the role miss is reported, but the user alternative still matches
    assert!(validator.is_usable());
    assert_eq!(validator.failures().len(), 1);
    match validator.collected() {
        [Value::User(user)] => assert_eq!(user.username, "bob"),
        other => panic!("expected a user, got {other:?}"),
    }
    assert_eq!(sink.messages(), vec!["Unable to find role bob"]);
}

/// Answers user and member lookups with different users so the branch taken
/// is visible in the collected value.
struct SplitLookup;

#[async_trait]
impl Lookup for SplitLookup {
    async fn resolve_user(&self, _: &Context, _: &str, _: bool) -> Option<User> {
        Some(User {
            id: "u".into(),
            username: "from_user".into(),
        })
    }

    async fn resolve_member(&self, _: &Context, _: &str, _: bool) -> Option<Member> {
        Some(Member {
            user: User {
                id: "m".into(),
                username: "from_member".into(),
            },
            nickname: Some("nick".into()),
        })
    }

    async fn resolve_channel(&self, _: &Context, _: &str, _: bool) -> Option<Channel> {
        None
    }

    async fn resolve_role(&self, _: &Context, _: &str) -> Option<Role> {
        None
    }
}

#[rstest]
#[case::direct_message(ChannelKind::Dm, "u", "from_user")]
#[case::guild_text(ChannelKind::Text, "m", "from_member")]
#[tokio::test]
async fn user_lookup_depends_on_channel_kind(
    #[case] kind: ChannelKind,
    #[case] expected_id: &str,
    #[case] expected_name: &str,
) {
    let context = Context::new(
        User {
            id: "1".into(),
            username: "alice".into(),
        },
        Channel {
            id: "20".into(),
            name: "conversation".into(),
            kind,
            viewable: true,
        },
    );
    let mut validator = Validator::new(
        Definition::parse_all("<who:User>").unwrap(),
        vec!["someone".into()],
        context,
    )
    .with_options(search(false))
    .with_lookup(SplitLookup);

    validator.validate().await;

    assert_eq!(
        validator.collected(),
        &[Value::User(User {
            id: expected_id.into(),
            username: expected_name.into(),
        })]
    );
}
