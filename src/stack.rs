//! Technology stack guess from repository paths.
//!
//! A cheap heuristic that needs no file contents: each marker is a path
//! substring that, when present anywhere in the tree, implies a technology.
//! The LLM analysis produces a richer answer; this one is always available.

use serde::{Deserialize, Serialize};

use crate::hierarchy::{flatten, FileNode};

/// Layer a detected technology belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Frontend,
    Backend,
    Devops,
}

const MARKERS: &[(&str, Layer, &str)] = &[
    ("package.json", Layer::Frontend, "Node.js"),
    ("tsconfig.json", Layer::Frontend, "TypeScript"),
    ("tailwind.config", Layer::Frontend, "Tailwind CSS"),
    ("next.config", Layer::Frontend, "Next.js"),
    ("App.tsx", Layer::Frontend, "React"),
    ("App.js", Layer::Frontend, "React"),
    ("vite.config", Layer::Frontend, "Vite"),
    ("angular.json", Layer::Frontend, "Angular"),
    ("manage.py", Layer::Backend, "Django"),
    ("requirements.txt", Layer::Backend, "Python"),
    ("pyproject.toml", Layer::Backend, "Python"),
    ("prisma", Layer::Backend, "Prisma"),
    ("go.mod", Layer::Backend, "Go"),
    ("pom.xml", Layer::Backend, "Java/Maven"),
    ("build.gradle", Layer::Backend, "Java/Gradle"),
    ("Cargo.toml", Layer::Backend, "Rust"),
    ("Gemfile", Layer::Backend, "Ruby"),
    ("composer.json", Layer::Backend, "PHP"),
    ("migrations/", Layer::Backend, "SQL migrations"),
    ("Dockerfile", Layer::Devops, "Docker"),
    ("docker-compose", Layer::Devops, "Docker Compose"),
    (".github/workflows", Layer::Devops, "GitHub Actions"),
    (".gitlab-ci", Layer::Devops, "GitLab CI"),
    ("terraform", Layer::Devops, "Terraform"),
    ("charts/", Layer::Devops, "Helm"),
    ("k8s/", Layer::Devops, "Kubernetes"),
];

/// Technologies detected per layer, in marker order, without duplicates.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StackSummary {
    /// Client-side technologies.
    pub frontend: Vec<String>,
    /// Server-side languages, frameworks and ORMs.
    pub backend: Vec<String>,
    /// Build, CI and deployment tooling.
    pub devops: Vec<String>,
}

impl StackSummary {
    /// Returns `true` if nothing was detected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frontend.is_empty() && self.backend.is_empty() && self.devops.is_empty()
    }

    fn layer_mut(&mut self, layer: Layer) -> &mut Vec<String> {
        match layer {
            Layer::Frontend => &mut self.frontend,
            Layer::Backend => &mut self.backend,
            Layer::Devops => &mut self.devops,
        }
    }
}

/// Guesses the stack from every path in `tree`.
#[must_use]
pub fn detect_stack(tree: &[FileNode]) -> StackSummary {
    detect_from_paths(flatten(tree).into_iter().map(|node| node.path.as_str()))
}

/// Guesses the stack from a list of paths.
pub fn detect_from_paths<'a>(paths: impl IntoIterator<Item = &'a str>) -> StackSummary {
    let paths: Vec<&str> = paths.into_iter().collect();
    let mut summary = StackSummary::default();
    for (marker, layer, technology) in MARKERS {
        if paths.iter().any(|path| path.contains(marker)) {
            let list = summary.layer_mut(*layer);
            if !list.iter().any(|t| t == technology) {
                list.push((*technology).to_string());
            }
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_map_to_layers() {
        let summary = detect_from_paths([
            "package.json",
            "web/tsconfig.json",
            "api/manage.py",
            "api/requirements.txt",
            "api/pyproject.toml",
            "prisma/schema.prisma",
            "Dockerfile",
            ".github/workflows/ci.yml",
        ]);
        assert_eq!(summary.frontend, vec!["Node.js", "TypeScript"]);
        assert_eq!(summary.backend, vec!["Django", "Python", "Prisma"]);
        assert_eq!(summary.devops, vec!["Docker", "GitHub Actions"]);
    }

    #[test]
    fn react_tailwind_and_prisma() {
        let summary = detect_from_paths(["src/App.tsx", "web/App.js", "tailwind.config.js", "prisma/schema.prisma"]);
        assert_eq!(summary.frontend, vec!["Tailwind CSS", "React"]);
        assert_eq!(summary.backend, vec!["Prisma"]);
        assert!(summary.devops.is_empty());
    }

    #[test]
    fn nothing_detected_for_plain_tree() {
        let summary = detect_from_paths(["README.md", "notes/todo.txt"]);
        assert!(summary.is_empty());
    }

    #[test]
    fn walks_nested_tree() {
        let mut infra = FileNode::folder("infra", "infra");
        infra.children = Some(vec![FileNode::file(
            "docker-compose.yml",
            "infra/docker-compose.yml",
            Some(10),
            crate::hierarchy::Complexity::Low,
        )]);
        let summary = detect_stack(&[infra]);
        assert_eq!(summary.devops, vec!["Docker Compose"]);
    }
}
