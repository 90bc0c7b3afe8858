//! Signing properties that hold for any request.

#[cfg(test)]
mod tests {
    use awsign_sigv4::{Credentials, ServiceScope, SignError, sign};
    use http::{HeaderMap, Request};

    use crate::{init_tracing, test_credentials, test_scope};

    fn request(headers: &[(&str, &str)], uri: &str) -> Request<()> {
        let mut builder = Request::get(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap()
    }

    fn authorization(headers: &[(&str, &str)], uri: &str) -> String {
        let mut req = request(headers, uri);
        sign(&test_credentials(), &test_scope(), &mut req)
            .unwrap()
            .authorization
    }

    #[test]
    fn test_should_ignore_header_name_case() {
        init_tracing();
        let lower = authorization(
            &[
                ("host", "example.amazonaws.com"),
                ("x-amz-date", "20150830T123600Z"),
                ("my-header1", "value1"),
            ],
            "/",
        );
        let mixed = authorization(
            &[
                ("Host", "example.amazonaws.com"),
                ("X-Amz-Date", "20150830T123600Z"),
                ("MY-HEADER1", "value1"),
            ],
            "/",
        );
        assert_eq!(lower, mixed);
    }

    #[test]
    fn test_should_ignore_header_insertion_order() {
        let forward = authorization(
            &[
                ("host", "example.amazonaws.com"),
                ("x-amz-date", "20150830T123600Z"),
                ("my-header1", "value1"),
                ("my-header1", "value2"),
            ],
            "/",
        );
        let reverse = authorization(
            &[
                ("my-header1", "value2"),
                ("my-header1", "value1"),
                ("x-amz-date", "20150830T123600Z"),
                ("host", "example.amazonaws.com"),
            ],
            "/",
        );
        assert_eq!(forward, reverse);
    }

    #[test]
    fn test_should_ignore_query_parameter_order() {
        let headers = [
            ("host", "example.amazonaws.com"),
            ("x-amz-date", "20150830T123600Z"),
        ];
        assert_eq!(
            authorization(&headers, "/?b=2&a=1&c=3"),
            authorization(&headers, "/?c=3&a=1&b=2"),
        );
    }

    #[test]
    fn test_should_ignore_existing_authorization_header() {
        let headers = [
            ("host", "example.amazonaws.com"),
            ("x-amz-date", "20150830T123600Z"),
        ];
        let mut with_stale = headers.to_vec();
        with_stale.push(("authorization", "AWS4-HMAC-SHA256 stale"));
        assert_eq!(authorization(&headers, "/"), authorization(&with_stale, "/"));
    }

    #[test]
    fn test_should_change_signature_with_any_signed_input() {
        let base = [
            ("host", "example.amazonaws.com"),
            ("x-amz-date", "20150830T123600Z"),
        ];
        let reference = authorization(&base, "/");

        assert_ne!(reference, authorization(&base, "/other"));
        assert_ne!(reference, authorization(&base, "/?a=1"));
        assert_ne!(
            reference,
            authorization(
                &[
                    ("host", "example.amazonaws.com"),
                    ("x-amz-date", "20150830T123601Z"),
                ],
                "/",
            )
        );

        let mut req = request(&base, "/");
        let other_region = sign(
            &test_credentials(),
            &ServiceScope::new("service", "eu-west-1"),
            &mut req,
        )
        .unwrap()
        .authorization;
        assert_ne!(reference, other_region);

        let mut req = request(&base, "/");
        let other_key = sign(
            &Credentials::new("AKIDEXAMPLE", "another-secret"),
            &test_scope(),
            &mut req,
        )
        .unwrap()
        .authorization;
        assert_ne!(reference, other_key);
    }

    #[test]
    fn test_should_prefer_amz_date_over_date() {
        let mut req = request(
            &[
                ("host", "example.amazonaws.com"),
                ("date", "Mon, 09 Sep 2011 23:36:00 GMT"),
                ("x-amz-date", "20150830T123600Z"),
            ],
            "/",
        );
        let artifacts = sign(&test_credentials(), &test_scope(), &mut req).unwrap();
        assert!(
            artifacts
                .string_to_sign
                .contains("\n20150830/us-east-1/service/aws4_request\n")
        );
        assert_eq!(req.headers()["date"], "Mon, 09 Sep 2011 23:36:00 GMT");
    }

    #[test]
    fn test_should_leave_request_untouched_without_timestamp() {
        let mut req = request(&[("my-header1", "value1")], "https://example.amazonaws.com/");
        let before: HeaderMap = req.headers().clone();

        let err = sign(&test_credentials(), &test_scope(), &mut req).unwrap_err();
        assert!(matches!(err, SignError::MissingTimestamp));
        assert_eq!(req.headers(), &before);
    }

    #[test]
    fn test_should_leave_request_untouched_with_malformed_timestamp() {
        let mut req = request(
            &[("host", "example.amazonaws.com"), ("x-amz-date", "2015-08-30")],
            "/",
        );
        let before: HeaderMap = req.headers().clone();

        let err = sign(&test_credentials(), &test_scope(), &mut req).unwrap_err();
        assert!(matches!(err, SignError::MalformedTimestamp { .. }));
        assert_eq!(req.headers(), &before);
    }

    #[test]
    fn test_should_sign_host_from_absolute_uri() {
        let mut absolute = request(
            &[("x-amz-date", "20150830T123600Z")],
            "https://example.amazonaws.com/",
        );
        let from_uri = sign(&test_credentials(), &test_scope(), &mut absolute)
            .unwrap()
            .authorization;
        assert_eq!(absolute.headers()["host"], "example.amazonaws.com");

        let from_header = authorization(
            &[
                ("host", "example.amazonaws.com"),
                ("x-amz-date", "20150830T123600Z"),
            ],
            "/",
        );
        assert_eq!(from_uri, from_header);
    }
}
