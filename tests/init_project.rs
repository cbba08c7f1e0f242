//! End-to-end checks for project creation: materialize a template, then
//! write the environment file, the way `buildpack init-project` does.

use std::fs;
use std::path::Path;

use buildpack::env_file::{self, EnvFile};
use buildpack::{NpmClient, ProjectDescriptor, Scaffold};
use tempfile::TempDir;

fn descriptor(npm_client: NpmClient) -> ProjectDescriptor {
    ProjectDescriptor {
        name: "acme-storefront".to_string(),
        author: "Acme <dev@acme.test>".to_string(),
        npm_client,
    }
}

#[test]
fn materialize_then_write_env_file() {
    let roots = TempDir::new().unwrap();
    let tpl = roots.path().join("venia-starter");
    fs::create_dir_all(tpl.join("src")).unwrap();
    fs::write(
        tpl.join("package.json"),
        r#"{"name":"venia-starter","scripts":{"watch":"webpack-dev-server"}}"#,
    )
    .unwrap();
    fs::write(tpl.join("package-lock.json"), "{}\n").unwrap();
    fs::write(tpl.join("SCAFFOLD_ONLY_babel.config.js"), "module.exports = {};\n").unwrap();
    fs::write(tpl.join("src/index.js"), "render();\n").unwrap();

    let project = TempDir::new().unwrap();
    let target = project.path().join("acme-storefront");

    Scaffold::new(roots.path())
        .create_project("venia-starter", &target, &descriptor(NpmClient::Npm))
        .unwrap();

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(target.join("package.json")).unwrap()).unwrap();
    assert_eq!(manifest["name"], "acme-storefront");
    assert_eq!(manifest["author"], "Acme <dev@acme.test>");
    assert_eq!(manifest["scripts"]["watch"], "webpack-dev-server");
    assert!(target.join("babel.config.js").exists());
    assert!(target.join("package-lock.json").exists());
    assert!(target.join("src/index.js").exists());

    let outcome = env_file::write_env_file(&target, "https://magento.test/").unwrap();
    assert_eq!(outcome, EnvFile::Written(target.join(".env")));
    let env = fs::read_to_string(target.join(".env")).unwrap();
    assert!(env.contains("MAGENTO_BACKEND_URL=https://magento.test/"));
}

#[test]
fn bundled_venia_starter_materializes() {
    // The scaffolds tree shipped in this repository must itself be a valid
    // template: marker names only, parseable manifest, both lockfiles.
    let scaffolds = Path::new(env!("CARGO_MANIFEST_DIR")).join("scaffolds");
    let project = TempDir::new().unwrap();
    let target = project.path().join("shop");

    Scaffold::new(&scaffolds)
        .create_project("venia-starter", &target, &descriptor(NpmClient::Yarn))
        .unwrap();

    assert!(target.join("babel.config.js").exists());
    assert!(target.join(".gitignore").exists());
    assert!(target.join("yarn.lock").exists());
    assert!(!target.join("package-lock.json").exists());

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(target.join("package.json")).unwrap()).unwrap();
    assert_eq!(manifest["name"], "acme-storefront");
    assert!(manifest["dependencies"]["react"].is_string());
}
