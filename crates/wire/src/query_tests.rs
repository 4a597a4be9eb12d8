use super::*;

#[yare::parameterized(
    no_query = {"/kv/ns/values/key", &[]},
    empty_query = {"/kv/ns/keys?", &[]},
    one_param = {"/kv/ns/keys?prefix=foo", &[("prefix", "foo")]},
    many_params = {"/kv/ns/keys?prefix=foo&cursor=abc&limit=10", &[("cursor", "abc"), ("limit", "10"), ("prefix", "foo")]},
    url_encoded = {"/kv/ns/keys?prefix=a%2Fb", &[("prefix", "a/b")]},
)]
fn parses_query_strings(url: &str, expected: &[(&str, &str)]) {
    let parsed = parse_query(url);
    let expected: BTreeMap<String, String> =
        expected.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    assert_eq!(parsed, expected);
}

#[test]
fn last_duplicate_wins() {
    let parsed = parse_query("/x?limit=1&limit=2");
    assert_eq!(parsed.get("limit").map(String::as_str), Some("2"));
}
