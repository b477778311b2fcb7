use super::*;
use crate::config::LoaderConfig;
use crate::declaration::ImportDeclaration;
use crate::environment::Environment;
use crate::fs::mock::MockFs;
use crate::processor::{ConfigurationProcessor, ConfigurationUnit};
use std::sync::Arc;

fn bootstrap(xml: &str) -> ApplicationContext {
    let fs = MockFs::new();
    fs.add_file("/cp/app.xml", xml);
    let config = LoaderConfig::default().with_classpath_root("/cp");
    let mut processor =
        ConfigurationProcessor::with_fs(Arc::new(fs), &config, Environment::isolated());
    processor.register_unit(
        ConfigurationUnit::new("AppConfig").import_resource(ImportDeclaration::new(["app.xml"])),
    );
    processor.bootstrap().unwrap()
}

#[test]
fn test_collect_rows_in_registration_order() {
    let context = bootstrap(
        r#"<beans>
            <bean id="b" name="bee" class="B"/>
            <bean id="a" class="A" scope="prototype"/>
        </beans>"#,
    );

    let rows = collect_rows(&context);

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, "b");
    assert_eq!(rows[0].aliases, vec!["bee"]);
    assert_eq!(rows[0].source.as_deref(), Some("class path resource [app.xml]"));
    assert_eq!(rows[1].name, "a");
    assert_eq!(rows[1].scope, "prototype");
}

#[test]
fn test_collect_rows_shows_parent_when_class_missing() {
    let context = bootstrap(
        r#"<beans>
            <bean id="base" abstract="true"/>
            <bean id="child" parent="base"/>
        </beans>"#,
    );

    let rows = collect_rows(&context);

    assert_eq!(rows[0].class, None);
    assert!(rows[0].abstract_definition);
    assert_eq!(rows[1].class.as_deref(), Some("(parent: base)"));
}

#[test]
fn test_json_output_shape() {
    let context = bootstrap(r#"<beans><bean id="a" class="A"/></beans>"#);
    let rows = collect_rows(&context);
    let output = LoadOutput {
        definitions: &rows,
        report: context.report(),
    };

    let json = serde_json::to_value(&output).unwrap();

    assert_eq!(json["definitions"][0]["name"], "a");
    assert_eq!(json["definitions"][0]["class"], "A");
    assert_eq!(json["definitions"][0]["abstract"], false);
    assert_eq!(json["report"]["loaded"][0]["unit"], "AppConfig");
    assert!(json["report"]["skipped"].as_array().unwrap().is_empty());
}
