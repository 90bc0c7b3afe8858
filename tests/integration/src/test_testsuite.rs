//! AWS SigV4 test suite conformance.

#[cfg(test)]
mod tests {
    use awsign_sigv4::canonical::{build_canonical_request, hash_payload};
    use awsign_sigv4::raw::parse_raw_request;
    use awsign_sigv4::sign;

    use crate::{fixture_names, init_tracing, read_fixture, test_credentials, test_scope};

    fn check_fixture(name: &str) {
        let raw = read_fixture(name, "req").unwrap();
        let mut request = parse_raw_request(&raw)
            .unwrap_or_else(|e| panic!("{name}: failed to parse request: {e}"));

        let artifacts = sign(&test_credentials(), &test_scope(), &mut request)
            .unwrap_or_else(|e| panic!("{name}: failed to sign: {e}"));

        assert_eq!(
            artifacts.canonical_request,
            read_fixture(name, "creq").unwrap(),
            "{name}: canonical request"
        );
        assert_eq!(
            artifacts.string_to_sign,
            read_fixture(name, "sts").unwrap(),
            "{name}: string to sign"
        );

        let expected_authz = read_fixture(name, "authz").unwrap();
        assert_eq!(artifacts.authorization, expected_authz, "{name}: authorization");
        assert_eq!(
            request.headers()["authorization"],
            expected_authz.as_str(),
            "{name}: authorization header"
        );

        // The signed request canonicalizes to what was signed.
        let recanonicalized = build_canonical_request(
            request.method(),
            request.uri(),
            request.headers(),
            &hash_payload(request.body()),
        );
        assert_eq!(recanonicalized, artifacts.canonical_request, "{name}: re-canonicalized");
    }

    #[test]
    fn test_should_match_every_fixture() {
        init_tracing();
        let names = fixture_names().unwrap();
        assert!(!names.is_empty(), "no fixtures found");
        for name in &names {
            check_fixture(name);
        }
    }

    #[test]
    fn test_should_sign_get_vanilla() {
        init_tracing();
        check_fixture("get-vanilla");
        assert!(
            read_fixture("get-vanilla", "authz")
                .unwrap()
                .ends_with("Signature=5fa00fa31553b73ebf1942676e86291e8372ff2a2260956d9b8aae1d763fbf31")
        );
    }

    #[test]
    fn test_should_sort_query_parameters_by_key() {
        check_fixture("get-vanilla-query-order-key-case");
    }

    #[test]
    fn test_should_sort_repeated_query_keys_by_value() {
        check_fixture("get-vanilla-query-order-value");
    }

    #[test]
    fn test_should_render_empty_query_value() {
        check_fixture("get-vanilla-empty-query-value");
        let creq = read_fixture("get-vanilla-empty-query-value", "creq").unwrap();
        assert_eq!(creq.lines().nth(2), Some("Param1="));
    }

    #[test]
    fn test_should_encode_utf8_path_and_query() {
        check_fixture("get-utf8");
        check_fixture("get-vanilla-utf8-query");
    }

    #[test]
    fn test_should_normalize_dot_segments() {
        for name in [
            "get-relative",
            "get-relative-relative",
            "get-slash",
            "get-slash-dot-slash",
            "get-slash-pointless-dot",
        ] {
            check_fixture(name);
        }
    }

    #[test]
    fn test_should_join_repeated_header_values() {
        check_fixture("get-header-key-duplicate");
        check_fixture("get-header-value-order");
        let creq = read_fixture("get-header-value-order", "creq").unwrap();
        assert!(creq.contains("my-header1:value1,value2,value3,value4\n"));
    }

    #[test]
    fn test_should_trim_and_collapse_header_values() {
        check_fixture("get-header-value-trim");
        let creq = read_fixture("get-header-value-trim", "creq").unwrap();
        assert!(creq.contains("my-header2:\"a b c\"\n"));
    }

    #[test]
    fn test_should_hash_form_body() {
        check_fixture("post-x-www-form-urlencoded");
        check_fixture("post-x-www-form-urlencoded-parameters");
    }

    #[test]
    fn test_should_sign_with_date_header() {
        check_fixture("get-date-header");
        let sts = read_fixture("get-date-header", "sts").unwrap();
        assert!(sts.starts_with(
            "AWS4-HMAC-SHA256\n20110909T233600Z\n20110909/us-east-1/service/aws4_request\n"
        ));
    }
}
