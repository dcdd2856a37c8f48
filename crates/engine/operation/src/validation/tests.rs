use indoc::indoc;
use pretty_assertions::assert_eq;
use schema::{Enum, Field, InputValue, Object, Schema};

use crate::parse::parse_document;

fn schema() -> Schema {
    Schema::build(
        Object::new("Query")
            .field(Field::new("hello", "String").argument(InputValue::new("name", "String")))
            .field(Field::new("hello_async", "String"))
            .field(Field::new("always_fail", "String"))
            .field(Field::new("user", "User"))
            .field(Field::new("users", "[User!]!").argument(InputValue::new("first", "Int!")))
            .field(Field::new("color", "Color").argument(InputValue::new("like", "Color"))),
    )
    .register_object(
        Object::new("User")
            .field(Field::new("id", "ID!"))
            .field(Field::new("name", "String"))
            .field(Field::new("age", "Int"))
            .field(Field::new("friend", "User")),
    )
    .register_enum(Enum::new("Color").values(["RED", "GREEN"]))
    .finish()
    .unwrap()
}

fn errors(document: &str) -> Vec<String> {
    let document = parse_document(document).unwrap();
    super::validate(&schema(), &document)
        .into_iter()
        .map(|err| {
            let locations = err
                .locations
                .iter()
                .map(|location| format!("{}:{}", location.line, location.column))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{} ({locations})", err.message)
        })
        .collect()
}

#[test]
fn valid_documents() {
    let document = indoc! {r#"
        query Users($first: Int! = 3, $withName: Boolean = true) {
            hello(name: "world")
            users(first: $first) {
                ...UserFields
                friend @include(if: $withName) { name }
            }
            color(like: RED)
            __typename
        }

        fragment UserFields on User {
            id
            name
            ... on User { age }
        }
    "#};
    assert_eq!(errors(document), Vec::<String>::new());
}

#[test]
fn unknown_fields() {
    assert_eq!(
        errors("{ hello, mistake }"),
        ["Cannot query field 'mistake' on type 'Query'. (1:10)"]
    );
    assert_eq!(
        errors("{ helo user { nmae } }"),
        [
            "Cannot query field 'helo' on type 'Query'. Did you mean 'hello'? (1:3)",
            "Cannot query field 'nmae' on type 'User'. Did you mean 'name'? (1:15)",
        ]
    );
}

#[test]
fn leaf_selections() {
    assert_eq!(
        errors("{ hello { name } user }"),
        [
            "Field 'hello' must not have a selection since type 'String' has no subfields. (1:9)",
            "Field 'user' of type 'User' must have a selection of subfields. Did you mean 'user { ... }'? (1:18)",
        ]
    );
}

#[test]
fn arguments() {
    assert_eq!(
        errors("{ hello(nam: \"a\", name: 1) users { id } }"),
        [
            "Unknown argument 'nam' on field 'Query.hello'. Did you mean 'name'? (1:9)",
            "Expected value of type 'String', found 1. (1:25)",
            "Field 'users' argument 'first' of type 'Int!' is required, but it was not provided. (1:28)",
        ]
    );
    assert_eq!(
        errors("{ color(like: BLUE) users(first: 1, first: 2) { id } }"),
        [
            "Expected value of type 'Color', found BLUE. (1:15)",
            "There can be only one argument named 'first'. (1:27, 1:37)",
        ]
    );
}

#[test]
fn fragments() {
    let document = indoc! {r#"
        {
            user { ...Unknown ...OnQuery }
            ...Unused2
        }

        fragment OnQuery on Query { hello }
        fragment Unused on User { name }
        fragment Unused2 on Query { ...Unused2 }
    "#};
    assert_eq!(
        errors(document),
        [
            "Fragment 'Unused' is never used. (7:1)",
            "Cannot spread fragment 'Unused2' within itself. (8:29)",
            "Unknown fragment 'Unknown'. (2:15)",
            "Fragment 'OnQuery' cannot be spread here as objects of type 'User' can never be of type 'Query'. (2:23)",
        ]
    );

    let document = indoc! {r#"
        { ...A }
        fragment A on Query { ...B }
        fragment B on Query { ...A }
        fragment C on String { hello }
    "#};
    assert_eq!(
        errors(document),
        [
            "Fragment 'C' cannot condition on non composite type 'String'. (4:15)",
            "Fragment 'C' is never used. (4:1)",
            "Cannot spread fragment 'A' within itself via 'B'. (2:23, 3:23)",
        ]
    );
}

#[test]
fn inline_fragments() {
    assert_eq!(
        errors("{ ... on Usr { id } ... on User { id } ... on Color { hello } }"),
        [
            "Unknown type 'Usr'. Did you mean 'User'? (1:10)",
            "Fragment cannot be spread here as objects of type 'Query' can never be of type 'User'. (1:21)",
            "Fragment cannot condition on non composite type 'Color'. (1:47)",
        ]
    );
}

#[test]
fn variables() {
    let document = indoc! {r#"
        query Op($unused: Int, $first: Int, $user: User, $first: Int) {
            users(first: $first) { id }
            hello(name: $undefined)
        }
    "#};
    assert_eq!(
        errors(document),
        [
            "Variable '$user' cannot be non-input type 'User'. (1:44)",
            "There can be only one variable named '$first'. (1:25, 1:51)",
            "Variable '$first' of type 'Int' used in position expecting type 'Int!'. (1:24, 2:18)",
            "Variable '$undefined' is not defined by operation 'Op'. (3:17, 1:1)",
            "Variable '$unused' is never used in operation 'Op'. (1:10)",
            "Variable '$user' is never used in operation 'Op'. (1:37)",
        ]
    );

    assert_eq!(
        errors("query ($first: Int = 1, $name: String = 2) { users(first: $first) { id } hello(name: $name) }"),
        ["Expected value of type 'String', found 2. (1:41)"]
    );
}

#[test]
fn directives() {
    assert_eq!(
        errors("query @skip(if: true) { hello @unknown user @include(if: true) @include(if: false) { id } }"),
        [
            "Directive '@skip' may not be used on QUERY. (1:7)",
            "Unknown directive '@unknown'. (1:31)",
            "The directive '@include' can only be used once at this location. (1:45, 1:64)",
        ]
    );
    assert_eq!(
        errors("{ hello @skip }"),
        ["Directive '@skip' argument 'if' of type 'Boolean!' is required, but it was not provided. (1:9)"]
    );
}

#[test]
fn overlapping_fields() {
    assert_eq!(
        errors("{ hello: helloAsync hello }"),
        ["Fields 'hello' conflict because 'helloAsync' and 'hello' are different fields. Use different aliases on the fields to fetch both if this was intentional. (1:3, 1:21)"]
    );
    assert_eq!(
        errors(r#"{ hello(name: "a") ...F } fragment F on Query { hello(name: "b") }"#),
        ["Fields 'hello' conflict because they have differing arguments. Use different aliases on the fields to fetch both if this was intentional. (1:3, 1:49)"]
    );
    assert_eq!(
        errors("{ user { x: name } user { x: age } }"),
        ["Fields 'user' conflict because subfields 'x' conflict because 'name' and 'age' are different fields. Use different aliases on the fields to fetch both if this was intentional. (1:3, 1:20, 1:10, 1:27)"]
    );
}
