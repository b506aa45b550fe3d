//! Overlay image mutation via `kustomize edit set image`.

use crate::error::Result;
use crate::inputs::Inputs;
use crate::runner::{CommandRunner, Invocation};
use tracing::{info, warn};

/// `<name>=<newName>:<newTag>`, passed as a single argument.
pub fn set_image_clause(name: &str, new_name: &str, new_tag: &str) -> String {
    format!("{}={}:{}", name, new_name, new_tag)
}

/// The `kustomize edit set image` call for `inputs`, run inside the overlay.
pub fn set_image_invocation(inputs: &Inputs) -> Invocation {
    let clause = set_image_clause(&inputs.name, &inputs.new_name, &inputs.new_tag);
    Invocation::new("kustomize", ["edit".to_string(), "set".to_string(), "image".to_string(), clause])
        .current_dir(inputs.overlay_dir())
}

/// Edit the overlay; `Ok(false)` when kustomize ran and exited non-zero.
pub async fn set_image(runner: &dyn CommandRunner, inputs: &Inputs) -> Result<bool> {
    let invocation = set_image_invocation(inputs);
    info!(overlay = %inputs.overlay_dir().display(), command = %invocation, "Setting image");

    let result = runner.run(&invocation).await?;
    if !result.passed() {
        warn!(exit_code = result.exit_code, "kustomize exited with failure");
    }
    Ok(result.passed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn inputs() -> Inputs {
        Inputs {
            kustomize_path: "overlays/prod".to_string(),
            name: "web".to_string(),
            new_name: "registry/web".to_string(),
            new_tag: "v2".to_string(),
            dont_push: false,
            working_directory: PathBuf::from("/repo"),
        }
    }

    #[test]
    fn test_set_image_clause() {
        assert_eq!(set_image_clause("web", "registry/web", "v2"), "web=registry/web:v2");
    }

    #[test]
    fn test_set_image_clause_is_not_validated() {
        assert_eq!(set_image_clause("", "a:b", "@sha"), "=a:b:@sha");
    }

    #[test]
    fn test_set_image_invocation() {
        let inv = set_image_invocation(&inputs());
        assert_eq!(inv.program, "kustomize");
        assert_eq!(inv.args, vec!["edit", "set", "image", "web=registry/web:v2"]);
        assert_eq!(inv.cwd, Some(PathBuf::from("/repo/overlays/prod")));
    }
}
