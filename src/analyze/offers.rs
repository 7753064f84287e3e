//! API surface extraction.
//!
//! Runs every registered dialect over every scanned class, resolves the
//! application base path, and groups the resulting path/method pairs per
//! originating package.

use std::collections::BTreeMap;
use std::path::Path;

use crate::analyze::basepath;
use crate::analyze::dialects::{dialects, DialectTables};
use crate::analyze::paths::{format_base_path, format_concat_path};
use crate::analyze::types::OfferDescription;
use crate::model::SourceModel;

/// Inputs for base-path resolution.
#[derive(Debug, Clone, Default)]
pub struct OfferConfig {
    /// Explicit context path; wins over every descriptor source.
    pub context_path: Option<String>,
    /// Explicit container-descriptor file; read before searching the tree.
    pub descriptor_file: Option<std::path::PathBuf>,
}

/// Extract the offered API surface of a source tree, one description per
/// package that declares endpoints.
pub fn extract(
    root: &Path,
    model: &SourceModel,
    config: &OfferConfig,
    tables: &DialectTables,
) -> Vec<OfferDescription> {
    let base_path = basepath::resolve(
        root,
        model,
        config.context_path.as_deref(),
        config.descriptor_file.as_deref(),
        tables,
    );
    if let Some(ref base) = base_path {
        log::info!("resolved API base path: {}", base);
    }

    let mut by_package: BTreeMap<String, OfferDescription> = BTreeMap::new();

    for class in model.classes() {
        for dialect in dialects() {
            let facts = dialect.extract_from_class(class, tables);
            if facts.is_empty() {
                continue;
            }
            log::debug!(
                "{} {} endpoint(s) in {}.{}",
                facts.len(),
                dialect.dialect_id(),
                class.package,
                class.name
            );
            let offer = by_package
                .entry(class.package.clone())
                .or_insert_with(|| OfferDescription::new(class.package.clone()));
            for fact in facts {
                offer.add_path_to_method(absolute_path(&fact.path, base_path.as_deref()), fact.method);
            }
        }
    }

    by_package.into_values().collect()
}

/// Resolve one relative fact path against the base path.
fn absolute_path(path: &str, base_path: Option<&str>) -> String {
    match base_path {
        Some(base) => format!("{}{}", base, format_concat_path(path)),
        None => format_base_path(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::types::HttpMethod;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, source: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, source).unwrap();
    }

    fn extract_all(root: &Path, config: &OfferConfig) -> Vec<OfferDescription> {
        let model = SourceModel::scan(root);
        extract(root, &model, config, &DialectTables::default())
    }

    #[test]
    fn test_both_dialects_produce_identical_pairs() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "com/a/Resource.java",
            r#"
package com.a;

@Path("/test")
public class Resource {
    @GET
    @Path("/{id}")
    public String find(@PathParam("id") String id) { return null; }
}
"#,
        );
        write(
            temp.path(),
            "com/b/Controller.java",
            r#"
package com.b;

@RestController
@RequestMapping("/test")
public class Controller {
    @GetMapping("/{id}")
    public String find(@PathVariable String id) { return null; }
}
"#,
        );

        let offers = extract_all(temp.path(), &OfferConfig::default());
        assert_eq!(offers.len(), 2);
        for offer in &offers {
            assert_eq!(
                offer.path_to_method_mappings["/test/{STRING}"]
                    .iter()
                    .collect::<Vec<_>>(),
                vec![&HttpMethod::Get]
            );
        }
    }

    #[test]
    fn test_same_package_offers_merge() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "com/a/First.java",
            r#"
package com.a;

@Path("/x")
public class First {
    @GET
    public String get() { return null; }
}
"#,
        );
        write(
            temp.path(),
            "com/a/Second.java",
            r#"
package com.a;

@Path("/x")
public class Second {
    @POST
    public String post() { return null; }
}
"#,
        );

        let offers = extract_all(temp.path(), &OfferConfig::default());
        assert_eq!(offers.len(), 1);
        assert_eq!(offers[0].package_name, "com.a");
        assert_eq!(offers[0].path_to_method_mappings["/x"].len(), 2);
    }

    #[test]
    fn test_base_path_is_prepended() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "com/a/Resource.java",
            r#"
package com.a;

@Path("/orders")
public class Resource {
    @GET
    public String list() { return null; }
}
"#,
        );

        let config = OfferConfig {
            context_path: Some("/shop".to_string()),
            descriptor_file: None,
        };
        let offers = extract_all(temp.path(), &config);
        assert!(offers[0].path_to_method_mappings.contains_key("/shop/orders"));
    }

    #[test]
    fn test_application_path_marker_is_lowest_priority_base() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "com/a/App.java",
            r#"
package com.a;

@ApplicationPath("/rest")
public class App {}
"#,
        );
        write(
            temp.path(),
            "com/a/Resource.java",
            r#"
package com.a;

@Path("/orders")
public class Resource {
    @GET
    public String list() { return null; }
}
"#,
        );

        let offers = extract_all(temp.path(), &OfferConfig::default());
        assert!(offers[0].path_to_method_mappings.contains_key("/rest/orders"));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "com/a/Resource.java",
            r#"
package com.a;

@Path("/orders")
public class Resource {
    @GET
    public String list() { return null; }
}
"#,
        );

        let first = extract_all(temp.path(), &OfferConfig::default());
        let second = extract_all(temp.path(), &OfferConfig::default());
        assert_eq!(first, second);
    }
}
