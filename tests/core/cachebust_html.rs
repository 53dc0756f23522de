//  ██████╗  █████╗ ███████╗███████╗██╗███╗   ██╗ ██████╗
//  ██╔══██╗██╔══██╗██╔════╝██╔════╝██║████╗  ██║██╔════╝
//  ██████╔╝███████║███████╗███████╗██║██╔██╗ ██║██║  ███╗
//  ██╔═══╝ ██╔══██║╚════██║╚════██║██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║███████║███████║██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod passing {
    use std::fs;

    use cachebust::core::{cachebust_html, CachebustOptions};
    use cachebust::utils::fingerprint::{fingerprint_bytes, DigestAlgorithm};
    use tempfile::TempDir;

    const APP_JS_SHA256: &str = "2bf8b125d15a71b5fa79fe710cae0db911a71e65891e270bca1d4eb5dd785288";
    const SITE_CSS_SHA256: &str =
        "9767e91e9d4b0334e59a1d389e9801bc6a2c5c4a5500a3c2c7915687965b2c16";

    fn site() -> (TempDir, CachebustOptions) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("js")).unwrap();
        fs::create_dir(dir.path().join("css")).unwrap();
        fs::create_dir(dir.path().join("img")).unwrap();
        fs::write(dir.path().join("js/app.js"), b"console.log(\"hi\");\n").unwrap();
        fs::write(dir.path().join("css/site.css"), b"body { color: red; }\n").unwrap();
        fs::write(dir.path().join("img/logo.png"), b"\x89PNG").unwrap();

        let mut options = CachebustOptions::new(dir.path());
        options.relative_root = dir.path().to_path_buf();
        options.quiet = true;

        (dir, options)
    }

    fn run(html: &str, options: &CachebustOptions) -> String {
        String::from_utf8(cachebust_html(html.as_bytes(), options).unwrap()).unwrap()
    }

    #[test]
    fn script_src() {
        let (_dir, options) = site();

        let result = run(r#"<script src="/js/app.js"></script>"#, &options);

        assert!(result.contains(&format!(
            r#"<script src="/js/app.js?cachebust={APP_JS_SHA256}"></script>"#
        )));
    }

    #[test]
    fn img_src_keeps_other_attributes() {
        let (_dir, options) = site();
        let png = fingerprint_bytes(b"\x89PNG", DigestAlgorithm::Sha256);

        let result = run(r#"<img alt="Logo" src="img/logo.png" width="10">"#, &options);

        assert!(result.contains(&format!(
            r#"<img alt="Logo" src="img/logo.png?cachebust={png}" width="10">"#
        )));
    }

    #[test]
    fn link_uses_rel_by_default() {
        let (_dir, options) = site();

        // rel holds the asset URL here, href is a placeholder
        let result = run(
            r#"<html><head><link rel="/css/site.css" href="/css/site.css"></head></html>"#,
            &options,
        );

        assert!(result.contains(&format!(
            r#"<link rel="/css/site.css?cachebust={SITE_CSS_SHA256}" href="/css/site.css">"#
        )));
    }

    #[test]
    fn link_attribute_override() {
        let (_dir, mut options) = site();
        options.link_attribute = "href".to_string();

        let result = run(
            r#"<html><head><link rel="stylesheet" href="/css/site.css"></head></html>"#,
            &options,
        );

        assert!(result.contains(&format!(
            r#"<link rel="stylesheet" href="/css/site.css?cachebust={SITE_CSS_SHA256}">"#
        )));
    }

    #[test]
    fn existing_query_is_escaped_in_output() {
        let (_dir, options) = site();

        let result = run(r#"<script src="/js/app.js?v=2"></script>"#, &options);

        assert!(result.contains(&format!(
            r#"src="/js/app.js?v=2&amp;cachebust={APP_JS_SHA256}""#
        )));
    }

    #[test]
    fn missing_assets_are_left_alone() {
        let (_dir, options) = site();

        let result = run(
            r#"<script src="/js/app.js"></script><script src="/js/gone.js?x=1"></script>"#,
            &options,
        );

        assert!(result.contains(&format!(r#"src="/js/app.js?cachebust={APP_JS_SHA256}""#)));
        assert!(result.contains(r#"src="/js/gone.js?x=1""#));
    }

    #[test]
    fn document_without_assets_is_unchanged_apart_from_serialization() {
        let (_dir, options) = site();

        let result = run("<!DOCTYPE html><p>Hello, World!</p>", &options);

        assert_eq!(
            result,
            "<!DOCTYPE html><html><head></head><body><p>Hello, World!</p></body></html>"
        );
    }

    #[test]
    fn second_run_is_a_no_op() {
        let (_dir, options) = site();
        let html = r#"<!DOCTYPE html><html><head><link rel="/css/site.css"></head><body><img src="/img/logo.png"><script src="/js/app.js?v=1"></script></body></html>"#;

        let once = cachebust_html(html.as_bytes(), &options).unwrap();
        let twice = cachebust_html(&once, &options).unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn tags_without_attribute_are_skipped() {
        let (_dir, options) = site();

        let result = run(r#"<script>var x = 1;</script><img alt="none">"#, &options);

        assert!(result.contains("<script>var x = 1;</script>"));
        assert!(result.contains(r#"<img alt="none">"#));
    }

    #[test]
    fn windows_1251_charset_is_kept() {
        let (_dir, options) = site();
        let mut html = b"<html><head><meta charset=\"windows-1251\"></head><body><p>".to_vec();
        // "Привет" in windows-1251
        html.extend_from_slice(&[0xCF, 0xF0, 0xE8, 0xE2, 0xE5, 0xF2]);
        html.extend_from_slice(b"</p><script src=\"/js/app.js\"></script></body></html>");

        let result = cachebust_html(&html, &options).unwrap();

        assert!(result
            .windows(6)
            .any(|w| w == [0xCF, 0xF0, 0xE8, 0xE2, 0xE5, 0xF2]));
        let needle = format!("/js/app.js?cachebust={APP_JS_SHA256}");
        assert!(result
            .windows(needle.len())
            .any(|w| w == needle.as_bytes()));
    }

    #[test]
    fn noscript_and_template_assets() {
        let (_dir, options) = site();
        let png = fingerprint_bytes(b"\x89PNG", DigestAlgorithm::Sha256);

        let result = run(
            r#"<body><noscript><img src="/img/logo.png"></noscript><img src="/img/logo.png"><template><img src="/img/logo.png"></template>"#,
            &options,
        );

        assert_eq!(
            result,
            format!(
                r#"<html><head></head><body><noscript><img src="/img/logo.png?cachebust={png}"></noscript><img src="/img/logo.png?cachebust={png}"><template><img src="/img/logo.png?cachebust={png}"></template></body></html>"#
            )
        );
    }

    #[test]
    fn template_content_survives_unresolved() {
        let (_dir, options) = site();
        let html = r#"<html><head></head><body><template id="row"><p class="name">x</p><script src="/js/gone.js"></script></template></body></html>"#;

        assert_eq!(run(html, &options), html);
    }

    #[test]
    fn noscript_stylesheet_in_head() {
        let (_dir, options) = site();

        let result = run(
            r#"<html><head><noscript><link rel="/css/site.css"></noscript></head><body></body></html>"#,
            &options,
        );

        assert!(result.contains(&format!(
            r#"<noscript><link rel="/css/site.css?cachebust={SITE_CSS_SHA256}"></noscript>"#
        )));
    }

    #[test]
    fn template_and_noscript_second_run_is_a_no_op() {
        let (_dir, options) = site();
        let html = r#"<body><noscript><img src="/img/logo.png"></noscript><template><script src="/js/app.js"></script></template>"#;

        let once = cachebust_html(html.as_bytes(), &options).unwrap();
        let twice = cachebust_html(&once, &options).unwrap();

        assert_eq!(once, twice);
        assert_eq!(
            String::from_utf8(once).unwrap().matches("cachebust=").count(),
            2
        );
    }

    #[test]
    fn custom_param_name() {
        let (_dir, mut options) = site();
        options.param_name = "v".to_string();

        let result = run(r#"<script src="/js/app.js?v=1"></script>"#, &options);

        assert!(result.contains(&format!(r#"src="/js/app.js?v={APP_JS_SHA256}""#)));
    }
}

//  ███████╗ █████╗ ██╗██╗     ██╗███╗   ██╗ ██████╗
//  ██╔════╝██╔══██╗██║██║     ██║████╗  ██║██╔════╝
//  █████╗  ███████║██║██║     ██║██╔██╗ ██║██║  ███╗
//  ██╔══╝  ██╔══██║██║██║     ██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║██║███████╗██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚═╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod failing {
    use cachebust::core::{cachebust_html, CachebustError, CachebustOptions};

    #[test]
    fn unknown_encoding() {
        let mut options = CachebustOptions::default();
        options.encoding = Some("utf-0".to_string());

        let result = cachebust_html(b"<p>hi</p>", &options);

        assert!(matches!(result, Err(CachebustError::UnknownEncoding(label)) if label == "utf-0"));
    }

    #[test]
    fn empty_input() {
        let mut options = CachebustOptions::default();
        options.quiet = true;

        let result = cachebust_html(b"", &options).unwrap();

        assert_eq!(
            String::from_utf8(result).unwrap(),
            "<html><head></head><body></body></html>"
        );
    }
}
