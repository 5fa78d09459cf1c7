//! Integration tests for hints merging, documentation resolution and
//! document assembly.

use json_home::{
    assemble, assemble_lenient, load_descriptors, to_json, Allow, AssembleError, Authentication,
    Descriptor, DescriptorFile, DocSource, Docs, DocsResolver, GeneratorOptions, Hints,
    HintsError, HrefVar, JsonHome, JsonHomeCache, JsonHomeGenerator, Precondition, Status, Target,
    VarConstraint,
};
use serde_json::json;
use std::fs;
use tempfile::TempDir;
use url::Url;

fn url(s: &str) -> Url {
    Url::parse(s).unwrap()
}

fn rel(name: &str) -> Url {
    url(&format!("http://example.org/rel/{name}"))
}

fn get() -> Hints {
    Hints::builder().allow(Allow::Get).build().unwrap()
}

fn fixed(name: &str, hints: Hints) -> Descriptor {
    Descriptor::new(
        rel(name),
        Target::Href(url(&format!("http://example.org/{name}"))),
        hints,
    )
}

fn templated(name: &str, template: &str, hints: Hints) -> Descriptor {
    let var_type = {
        let mut u = rel(name);
        u.set_fragment(Some("id"));
        u
    };
    Descriptor::new(
        rel(name),
        Target::Template {
            template: template.to_string(),
            vars: vec![HrefVar::new("id", var_type, VarConstraint::Integer)],
        },
        hints,
    )
}

// === Hints ===

mod hints {
    use super::*;

    #[test]
    fn accept_post_requires_post() {
        let result = Hints::new(
            [Allow::Get],
            vec![],
            vec![],
            vec!["application/json".to_string()],
            [],
            Status::Current,
            Docs::empty(),
        );
        assert_eq!(result, Err(HintsError::AcceptPostWithoutPost));
    }

    #[test]
    fn accept_put_requires_put() {
        let result = Hints::new(
            [Allow::Get, Allow::Post],
            vec![],
            vec!["application/json".to_string()],
            vec![],
            [],
            Status::Current,
            Docs::empty(),
        );
        assert_eq!(result, Err(HintsError::AcceptPutWithoutPut));
    }

    #[test]
    fn valid_hints_construct() {
        let hints = Hints::new(
            [Allow::Put, Allow::Post],
            vec!["application/json".to_string()],
            vec!["application/json".to_string()],
            vec!["application/x-www-form-urlencoded".to_string()],
            [Precondition::Etag],
            Status::Deprecated,
            Docs::from_description(["A product."]),
        )
        .unwrap();
        assert!(hints.allows().contains(&Allow::Put));
        assert_eq!(hints.status(), Status::Deprecated);
        assert_eq!(hints.precondition_req().as_slice(), &[Precondition::Etag]);
    }

    #[test]
    fn merge_keeps_first_seen_order() {
        let html = Hints::builder()
            .allow(Allow::Get)
            .representations(["text/html", "application/json"])
            .build()
            .unwrap();
        let json = Hints::builder()
            .allow(Allow::Get)
            .representations(["application/json", "application/xml"])
            .build()
            .unwrap();
        let merged = html.merge_with(&json);
        assert_eq!(
            merged.representations().as_slice(),
            &["text/html", "application/json", "application/xml"]
        );
    }

    #[test]
    fn merge_takes_most_restrictive_status() {
        let current = get();
        let gone = Hints::builder().allow(Allow::Get).status(Status::Gone).build().unwrap();
        let deprecated = Hints::builder()
            .allow(Allow::Get)
            .status(Status::Deprecated)
            .build()
            .unwrap();
        assert_eq!(current.merge_with(&deprecated).status(), Status::Deprecated);
        assert_eq!(gone.merge_with(&deprecated).status(), Status::Gone);
        assert_eq!(current.merge_with(&current).status(), Status::Current);
    }

    #[test]
    fn merge_unions_auth_requirements() {
        let basic = Hints::builder()
            .allow(Allow::Get)
            .auth_req([Authentication::new("Basic")])
            .build()
            .unwrap();
        let digest = Hints::builder()
            .allow(Allow::Put)
            .auth_req([Authentication::new("Digest"), Authentication::new("Basic")])
            .build()
            .unwrap();
        let merged = basic.merge_with(&digest);
        let schemes: Vec<&str> = merged.auth_req().iter().map(|a| a.scheme.as_str()).collect();
        assert_eq!(schemes, vec!["Basic", "Digest"]);
    }
}

// === Docs ===

mod docs {
    use super::*;

    #[test]
    fn empty_is_identity() {
        let docs = Docs::new(
            vec!["A".into(), "B".into()],
            Some("<p>detail</p>".into()),
            Some(url("http://example.org/docs")),
        );
        assert_eq!(Docs::empty().merge_with(&docs), docs);
        assert_eq!(docs.merge_with(&Docs::empty()), docs);
    }

    #[test]
    fn first_declared_link_wins() {
        let first = Docs::from_link(url("http://example.org/first"));
        let second = Docs::new(
            vec!["second".into()],
            None,
            Some(url("http://example.org/second")),
        );
        let merged = first.merge_with(&second);
        assert_eq!(merged.link(), Some(&url("http://example.org/first")));
        assert_eq!(merged.description(), vec!["second"]);
    }

    #[test]
    fn repeated_description_lines_are_kept() {
        let a = Docs::from_description(["Same text."]);
        let merged = a.merge_with(&a);
        assert_eq!(merged.description(), vec!["Same text.", "Same text."]);
    }
}

// === Documentation resolution ===

mod docs_resolution {
    use super::*;

    fn foo() -> Url {
        url("http://example.org/rel/foo")
    }

    fn link(link: &str) -> DocSource {
        DocSource {
            link: Some(link.to_string()),
            ..DocSource::default()
        }
    }

    fn include(path: &str) -> DocSource {
        DocSource {
            include: Some(path.to_string()),
            ..DocSource::default()
        }
    }

    #[test]
    fn absolute_link_is_kept() {
        let resolver = DocsResolver::new(".", "docs/*");
        let docs = resolver
            .resolve(&foo(), &link("http://example.org/foo/bar.html"))
            .into_docs();
        assert_eq!(docs.link(), Some(&url("http://example.org/foo/bar.html")));
    }

    #[test]
    fn relative_link_is_resolved_against_base() {
        let resolver = DocsResolver::new(".", "docs/*");
        let docs = resolver.resolve(&foo(), &link("/foo/bar.html")).into_docs();
        assert_eq!(docs.link(), Some(&url("http://example.org/foo/bar.html")));
    }

    #[test]
    fn markdown_include_becomes_detailed_description() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("docs/test.md"), "# Hello World!\n").unwrap();

        let resolved = DocsResolver::new(dir.path(), "docs/*").resolve(&foo(), &include("test.md"));
        assert!(!resolved.is_partial());
        let docs = resolved.into_docs();
        assert!(docs.description().is_empty());
        assert_eq!(
            docs.detailed_description(),
            Some("<h1>Hello World!</h1>")
        );
    }

    #[test]
    fn missing_include_is_absorbed() {
        let dir = TempDir::new().unwrap();
        let resolved =
            DocsResolver::new(dir.path(), "docs/*").resolve(&foo(), &include("/doesnotexist.md"));
        assert!(resolved.is_partial());
        let docs = resolved.into_docs();
        assert!(docs.description().is_empty());
        assert!(docs.detailed_description().is_none());
    }
}

// === Assembly ===

mod assembly {
    use super::*;

    #[test]
    fn first_seen_order_is_preserved() {
        let document = assemble(vec![fixed("b", get()), fixed("a", get())]).unwrap();
        let order: Vec<&Url> = document.relation_types().collect();
        assert_eq!(order, vec![&rel("b"), &rel("a")]);
    }

    #[test]
    fn descriptors_are_grouped_by_relation_type() {
        let post = Hints::builder()
            .allow(Allow::Post)
            .accept_post(["application/json"])
            .build()
            .unwrap();
        let document = assemble(vec![
            fixed("a", get()),
            fixed("b", get()),
            fixed("a", post),
        ])
        .unwrap();

        assert_eq!(document.len(), 2);
        let a = document.get(&rel("a")).unwrap();
        let allows: Vec<Allow> = a.hints().allows().iter().copied().collect();
        assert_eq!(allows, vec![Allow::Get, Allow::Post]);
        assert_eq!(a.href(), Some(&url("http://example.org/a")));
    }

    #[test]
    fn fixed_and_templated_conflict() {
        let result = assemble(vec![
            fixed("a", get()),
            templated("a", "http://example.org/a/{id}", get()),
        ]);
        match result {
            Err(err @ AssembleError::ConflictingResourceLink { .. }) => {
                assert_eq!(err.relation_type(), &rel("a"));
            }
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[test]
    fn differing_templates_conflict() {
        let result = assemble(vec![
            templated("a", "http://example.org/a/{id}", get()),
            templated("a", "http://example.org/items/{id}", get()),
        ]);
        assert!(matches!(
            result,
            Err(AssembleError::ConflictingResourceLink { .. })
        ));
    }

    #[test]
    fn matching_templates_merge() {
        let put = Hints::builder()
            .allow(Allow::Put)
            .accept_put(["application/json"])
            .build()
            .unwrap();
        let document = assemble(vec![
            templated("a", "http://example.org/a/{id}", get()),
            templated("a", "http://example.org/a/{id}", put),
        ])
        .unwrap();
        let a = document.get(&rel("a")).unwrap();
        assert!(a.is_templated());
        assert_eq!(a.href_vars().len(), 1);
        assert_eq!(a.hints().accept_put().as_slice(), &["application/json"]);
    }

    #[test]
    fn lenient_assembly_skips_conflicting_descriptors() {
        let (document, errors) = assemble_lenient(vec![
            fixed("a", get()),
            templated("a", "http://example.org/a/{id}", get()),
            fixed("b", get()),
        ]);
        assert_eq!(document.len(), 2);
        assert_eq!(errors.len(), 1);
        assert!(!document.get(&rel("a")).unwrap().is_templated());
    }

    #[test]
    fn repeated_assembly_is_identical() {
        let descriptors = || vec![fixed("z", get()), fixed("m", get()), fixed("a", get())];
        let first = serde_json::to_string(&to_json(&assemble(descriptors()).unwrap())).unwrap();
        let second = serde_json::to_string(&to_json(&assemble(descriptors()).unwrap())).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_input_gives_empty_document() {
        let document = assemble(Vec::<Descriptor>::new()).unwrap();
        assert_eq!(document, JsonHome::empty());
        assert_eq!(to_json(&document), json!({ "resources": {} }));
    }
}

// === End to end ===

mod end_to_end {
    use super::*;

    const SHOP: &str = r#"{"resources": [
        {
            "rel": "/rel/products",
            "href": "/products",
            "hints": {"allow": ["GET"], "representations": ["text/html"]},
            "doc": {"value": ["The collection of products."], "include": "/products.md"}
        },
        {
            "rel": "/rel/products",
            "href": "/products",
            "hints": {"allow": ["POST"], "accept-post": ["application/x-www-form-urlencoded"]},
            "doc": {"value": ["Create a product."], "link": "/docs/products.html"}
        },
        {
            "rel": "/rel/product",
            "href-template": "/products/{productId}",
            "href-vars": {
                "productId": {"type": "integer", "doc": {"value": ["The id of a product."]}}
            },
            "hints": {
                "allow": ["GET", "PUT"],
                "representations": ["application/json"],
                "accept-put": ["application/json"],
                "precondition-req": ["etag"],
                "auth-req": [{"scheme": "Basic", "realms": ["shop"]}]
            }
        }
    ]}"#;

    fn shop() -> (TempDir, GeneratorOptions) {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        fs::write(
            dir.path().join("docs/products.md"),
            "# Products\n\nAll *products* of the shop.\n",
        )
        .unwrap();
        fs::write(dir.path().join("shop.json"), SHOP).unwrap();
        let options = GeneratorOptions::new(url("http://example.org")).doc_root_dir(dir.path());
        (dir, options)
    }

    #[test]
    fn generates_shop_document() {
        let (dir, options) = shop();
        let source = DescriptorFile::new(dir.path().join("shop.json").to_str().unwrap());
        let document = JsonHomeGenerator::new(options, source).generate().unwrap();

        let products = document.get(&rel("products")).unwrap();
        let docs = products.hints().docs();
        assert_eq!(
            docs.description(),
            vec!["The collection of products.", "Create a product."]
        );
        assert_eq!(
            docs.detailed_description(),
            Some("<h1>Products</h1>\n<p>All <em>products</em> of the shop.</p>")
        );
        assert_eq!(docs.link(), Some(&url("http://example.org/docs/products.html")));

        let product = document.get(&rel("product")).unwrap();
        let var = &product.href_vars()[0];
        assert_eq!(var.var_type, url("http://example.org/rel/product#productId"));
        assert!(var.accepts("42"));
        assert!(!var.accepts("forty-two"));
        assert_eq!(var.docs.description(), vec!["The id of a product."]);

        assert_eq!(
            to_json(&document),
            json!({
                "resources": {
                    "http://example.org/rel/products": {
                        "href": "http://example.org/products",
                        "hints": {
                            "allow": ["GET", "POST"],
                            "representations": ["text/html"],
                            "accept-post": ["application/x-www-form-urlencoded"],
                            "docs": "http://example.org/docs/products.html"
                        }
                    },
                    "http://example.org/rel/product": {
                        "href-template": "http://example.org/products/{productId}",
                        "href-vars": {
                            "productId": "http://example.org/rel/product#productId"
                        },
                        "hints": {
                            "allow": ["GET", "PUT"],
                            "representations": ["application/json"],
                            "accept-put": ["application/json"],
                            "precondition-req": ["etag"],
                            "auth-req": [{"scheme": "Basic", "realms": ["shop"]}]
                        }
                    }
                }
            })
        );
    }

    #[test]
    fn descriptor_files_round_into_the_same_document_as_code() {
        let (dir, options) = shop();
        let from_file = load_descriptors(&dir.path().join("shop.json"))
            .unwrap()
            .into_descriptors(&options)
            .unwrap();
        assert_eq!(from_file.len(), 3);

        let document = JsonHomeGenerator::new(options, from_file).generate().unwrap();
        assert_eq!(document.len(), 2);
    }

    #[test]
    fn cache_publishes_generated_document() {
        let (dir, options) = shop();
        let source = DescriptorFile::new(dir.path().join("shop.json").to_str().unwrap());
        let cache = JsonHomeCache::new(JsonHomeGenerator::new(options, source), None);

        let document = cache.current().unwrap();
        assert_eq!(document.len(), 2);

        // Removing the source does not affect the published document.
        fs::remove_file(dir.path().join("shop.json")).unwrap();
        assert_eq!(cache.current().unwrap().len(), 2);
        assert!(cache.refresh().is_err());
    }
}

// === Properties ===

mod properties {
    use super::*;
    use proptest::prelude::*;

    const METHODS: [Allow; 7] = [
        Allow::Get,
        Allow::Head,
        Allow::Post,
        Allow::Put,
        Allow::Patch,
        Allow::Delete,
        Allow::Options,
    ];

    const MEDIA: [&str; 4] = [
        "text/html",
        "application/json",
        "application/xml",
        "text/plain",
    ];

    fn media() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(prop::sample::select(MEDIA.to_vec()), 0..4)
            .prop_map(|v| v.into_iter().map(String::from).collect())
    }

    fn status() -> impl Strategy<Value = Status> {
        prop::sample::select(vec![Status::Current, Status::Deprecated, Status::Gone])
    }

    fn docs() -> impl Strategy<Value = Docs> {
        (
            prop::collection::vec("[a-z]{1,8}", 0..3),
            prop::option::of("[a-z]{1,8}"),
            prop::option::of("[a-z]{1,8}"),
        )
            .prop_map(|(description, detailed, link)| {
                Docs::new(
                    description,
                    detailed,
                    link.map(|l| url(&format!("http://example.org/docs/{l}"))),
                )
            })
    }

    /// Valid hints: accept lists are only kept when their method is allowed.
    fn hints() -> impl Strategy<Value = Hints> {
        (
            prop::collection::vec(prop::sample::select(METHODS.to_vec()), 0..5),
            media(),
            media(),
            media(),
            prop::collection::vec(
                prop::sample::select(vec![Precondition::Etag, Precondition::LastModified]),
                0..3,
            ),
            status(),
            docs(),
        )
            .prop_map(|(allows, reps, put, post, pre, status, docs)| {
                let put = if allows.contains(&Allow::Put) { put } else { vec![] };
                let post = if allows.contains(&Allow::Post) { post } else { vec![] };
                Hints::new(allows, reps, put, post, pre, status, docs).unwrap()
            })
    }

    proptest! {
        #[test]
        fn merged_allows_are_the_union(a in hints(), b in hints()) {
            let merged = a.merge_with(&b);
            let union: std::collections::BTreeSet<Allow> =
                a.allows().union(b.allows()).copied().collect();
            prop_assert_eq!(merged.allows(), &union);
        }

        #[test]
        fn merge_is_associative(a in hints(), b in hints(), c in hints()) {
            prop_assert_eq!(
                a.merge_with(&b).merge_with(&c),
                a.merge_with(&b.merge_with(&c))
            );
        }

        #[test]
        fn merged_hints_stay_valid(a in hints(), b in hints()) {
            let merged = a.merge_with(&b);
            if !merged.accept_post().is_empty() {
                prop_assert!(merged.allows().contains(&Allow::Post));
            }
            if !merged.accept_put().is_empty() {
                prop_assert!(merged.allows().contains(&Allow::Put));
            }
        }

        #[test]
        fn empty_docs_is_identity(d in docs()) {
            prop_assert_eq!(Docs::empty().merge_with(&d), d.clone());
            prop_assert_eq!(d.merge_with(&Docs::empty()), d);
        }

        #[test]
        fn status_merge_is_max(a in status(), b in status()) {
            prop_assert_eq!(a.merge_with(b), a.max(b));
            prop_assert_eq!(a.merge_with(b), b.merge_with(a));
        }
    }
}
