//! Prints the CustomResourceDefinitions of the operator as a YAML stream.
//!
//! ```bash
//! cargo run --bin crdgen | kubectl apply -f -
//! ```

use anyhow::Result;
use kube::CustomResourceExt;
use sentry_operator::crd::{Project, ProjectKey, Team};

fn main() -> Result<()> {
    let crds = [Team::crd(), Project::crd(), ProjectKey::crd()];
    for crd in &crds {
        println!("---");
        print!("{}", serde_yaml::to_string(crd)?);
    }
    Ok(())
}
