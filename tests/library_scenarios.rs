//! End-to-end scans over in-memory projects.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use preflight::check::{
    has_errors, has_warnings, CheckManager, Issue, NoopObserver, ObjectRef, PreflightRule, RuleId,
    ScanContext, Scope, Severity,
};
use preflight::config::RulesConfig;
use preflight::project::model::{
    Animator, Asset, Component, GameObject, Material, PrefabLink, PropertyOverride, Scene,
    ShaderRef, SkinnedMeshRenderer,
};
use preflight::project::{Host, MemoryProject};
use preflight::Result;

const KNIGHT: &str = "Assets/uBody/uBody_Knight.prefab";

fn renderer(update_when_offscreen: bool) -> Component {
    Component::SkinnedMeshRenderer(SkinnedMeshRenderer {
        update_when_offscreen,
        materials: Vec::new(),
    })
}

fn three_renderer_body() -> GameObject {
    GameObject::new("uBody_Knight")
        .with_child(GameObject::new("Head").with_component(renderer(false)))
        .with_child(GameObject::new("Torso").with_component(renderer(false)))
        .with_child(GameObject::new("Legs").with_component(renderer(false)))
}

fn scan(manager: &CheckManager, project: &mut MemoryProject) -> Vec<Issue> {
    manager
        .run_all_checks(project, &mut NoopObserver)
        .unwrap()
        .issues
}

#[test]
fn offscreen_renderers_are_reported_and_fixed_in_one_call() {
    let mut project = MemoryProject::new();
    project.add_addressable(KNIGHT, Asset::Prefab(three_renderer_body()));
    let manager = CheckManager::new(&RulesConfig::default(), &project);

    let issues = scan(&manager, &mut project);
    assert_eq!(issues.len(), 3);
    assert!(issues
        .iter()
        .all(|i| i.rule_id().as_str() == "offscreen-update" && i.severity() == Severity::Warning));
    let components: Vec<&str> = issues
        .iter()
        .map(|i| i.specific_component().unwrap().hierarchy_path.as_str())
        .collect();
    assert_eq!(
        components,
        ["uBody_Knight/Head", "uBody_Knight/Torso", "uBody_Knight/Legs"]
    );

    let summary = manager.auto_fix_all(&issues, &mut project);
    assert_eq!(summary.assumed_fixed, 3);
    assert_eq!(summary.fix_calls, 1);
    assert_eq!(project.saves(), [KNIGHT]);
    assert_eq!(project.refresh_count(), 1);
    assert_eq!(project.open_working_copies(), 0);

    assert!(scan(&manager, &mut project).is_empty());
}

#[test]
fn non_addressable_shader_is_an_unfixable_error() {
    let material = |name: &str, shader: &str| {
        Some(Material {
            name: name.to_string(),
            shader: Some(ShaderRef {
                name: shader.to_string(),
                path: Some(format!("Assets/Shaders/{}.shader", shader)),
            }),
        })
    };
    let body = GameObject::new("Cape").with_component(Component::SkinnedMeshRenderer(
        SkinnedMeshRenderer {
            update_when_offscreen: true,
            materials: vec![material("Cloth", "Toon"), material("Trim", "Standard"), None],
        },
    ));

    let mut project = MemoryProject::new();
    project.add_addressable(
        "Assets/Shaders/Standard.shader",
        Asset::Shader(preflight::project::model::Shader {
            name: "Standard".into(),
        }),
    );
    project.add_addressable("Assets/Props/Cape.prefab", Asset::Prefab(body));
    let manager = CheckManager::new(&RulesConfig::default(), &project);

    let issues = scan(&manager, &mut project);
    assert_eq!(issues.len(), 1);
    let issue = &issues[0];
    assert_eq!(issue.rule_id().as_str(), "addressable-shader");
    assert_eq!(issue.severity(), Severity::Error);
    assert!(issue.message().contains("'Cloth'"));
    assert!(issue.message().contains("'Toon'"));

    let rule = manager.registry().get(issue.rule_id()).unwrap();
    assert!(!rule.can_auto_fix());

    let summary = manager.auto_fix_all(&issues, &mut project);
    assert_eq!(summary.fix_calls, 0);
    assert_eq!(summary.assumed_fixed, 0);
    assert!(project.saves().is_empty());
    assert_eq!(scan(&manager, &mut project), issues);
}

#[test]
fn obody_missing_avatar_and_missing_animator_differ() {
    let mut project = MemoryProject::new();
    project.add_addressable(
        "Assets/oBody/Unbound.prefab",
        Asset::Prefab(
            GameObject::new("Unbound")
                .with_component(Component::Animator(Animator { avatar: None })),
        ),
    );
    project.add_addressable(
        "Assets/oBody/Bare.prefab",
        Asset::Prefab(GameObject::new("Bare")),
    );
    project.add_addressable(
        "Assets/oBody/Bound.prefab",
        Asset::Prefab(GameObject::new("Bound").with_component(Component::Animator(Animator {
            avatar: Some("BoundAvatar".into()),
        }))),
    );
    let manager = CheckManager::new(&RulesConfig::default(), &project);

    let issues = scan(&manager, &mut project);
    assert_eq!(issues.len(), 2);
    assert!(issues.iter().all(|i| i.severity() == Severity::Error));
    assert_eq!(issues[0].asset_path(), "Assets/oBody/Unbound.prefab");
    assert_eq!(issues[1].asset_path(), "Assets/oBody/Bare.prefab");
    assert_ne!(issues[0].message(), issues[1].message());
}

#[test]
fn scene_override_on_addressable_template_is_a_warning() {
    let source = "Assets/Props/Lantern.prefab";
    let mut project = MemoryProject::new();
    project.add_addressable(source, Asset::Prefab(GameObject::new("Lantern")));
    project.add_scene(
        "Assets/Scenes/Camp.unity",
        Scene {
            path: String::new(),
            roots: vec![
                GameObject::new("Lantern (edited)").with_prefab(
                    PrefabLink::new(source)
                        .with_override(PropertyOverride::new("m_Intensity", 2.5).on("Light")),
                ),
                GameObject::new("Lantern (clean)").with_prefab(
                    PrefabLink::new(source)
                        .with_override(PropertyOverride::new("m_LocalPosition.x", 1.0)),
                ),
            ],
        },
    );
    let manager = CheckManager::new(&RulesConfig::default(), &project);

    let issues = scan(&manager, &mut project);
    assert_eq!(issues.len(), 1);
    let issue = &issues[0];
    assert_eq!(issue.rule_id().as_str(), "prefab-overrides-in-scenes");
    assert_eq!(issue.severity(), Severity::Warning);
    assert_eq!(issue.asset_path(), "Assets/Scenes/Camp.unity");
    assert_eq!(
        issue.asset(),
        &ObjectRef::new("Assets/Scenes/Camp.unity", "Lantern (edited)")
    );
}

#[test]
fn auto_fix_is_idempotent() {
    let mut project = MemoryProject::new();
    project.add_addressable(KNIGHT, Asset::Prefab(three_renderer_body()));
    let manager = CheckManager::new(&RulesConfig::default(), &project);
    let issues = scan(&manager, &mut project);

    manager.auto_fix_all(&issues, &mut project);
    let after_first = project.asset(KNIGHT).cloned();
    let saves_after_first = project.saves().len();

    let second = manager.auto_fix_all(&issues, &mut project);
    assert_eq!(second.assumed_fixed, 3);
    assert_eq!(project.asset(KNIGHT).cloned(), after_first);
    assert_eq!(project.saves().len(), saves_after_first);
}

#[test]
fn verified_fix_counts_what_actually_changed() {
    let mut project = MemoryProject::new();
    project.add_addressable(KNIGHT, Asset::Prefab(three_renderer_body()));
    project.add_addressable("Assets/oBody/Bare.prefab", Asset::Prefab(GameObject::new("Bare")));
    let manager = CheckManager::new(&RulesConfig::default(), &project);
    let issues = scan(&manager, &mut project);
    assert_eq!(issues.len(), 4);

    let (summary, verification) = manager
        .auto_fix_all_verified(&issues, &mut project)
        .unwrap();

    assert_eq!(summary.fix_calls, 1);
    assert_eq!(verification.resolved, 3);
    assert_eq!(verification.still_present, 0);
    assert_eq!(verification.report.issues.len(), 1);
    assert!(has_errors(&verification.report.issues));
    assert!(!has_warnings(&verification.report.issues));
}

struct CountingRule {
    id: &'static str,
    fixes: Arc<AtomicUsize>,
    validations: Arc<AtomicUsize>,
}

impl PreflightRule for CountingRule {
    fn id(&self) -> RuleId {
        RuleId::new(self.id)
    }

    fn name(&self) -> &str {
        "Counting"
    }

    fn description(&self) -> &str {
        "Reports two issues per prefab"
    }

    fn default_severity(&self) -> Severity {
        Severity::Info
    }

    fn applies_to(&self, scope: &Scope<'_>) -> bool {
        scope.path().ends_with("Flagged.prefab")
    }

    fn validate(&self, scope: &Scope<'_>, _ctx: &mut ScanContext<'_>) -> Result<Vec<Issue>> {
        self.validations.fetch_add(1, Ordering::SeqCst);
        let path = scope.path();
        Ok((0..2)
            .map(|n| {
                Issue::new(
                    self.id(),
                    self.default_severity(),
                    path,
                    format!("issue {}", n),
                    ObjectRef::new(path, "root"),
                )
            })
            .collect())
    }

    fn can_auto_fix(&self) -> bool {
        true
    }

    fn auto_fix(&self, _issue: &Issue, _host: &mut dyn Host) -> Result<bool> {
        self.fixes.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    }
}

#[test]
fn grouping_calls_fix_once_per_asset_and_skips_non_applicable() {
    let fixes = Arc::new(AtomicUsize::new(0));
    let validations = Arc::new(AtomicUsize::new(0));

    let mut project = MemoryProject::new();
    project.add_addressable("Assets/A/Flagged.prefab", Asset::Prefab(GameObject::new("a")));
    project.add_addressable("Assets/B/Flagged.prefab", Asset::Prefab(GameObject::new("b")));
    project.add_addressable("Assets/C/Other.prefab", Asset::Prefab(GameObject::new("c")));

    let mut manager = CheckManager::new(&RulesConfig::default(), &project);
    manager.registry_mut().register(Box::new(CountingRule {
        id: "counting",
        fixes: fixes.clone(),
        validations: validations.clone(),
    }));

    let issues = scan(&manager, &mut project);
    assert_eq!(issues.len(), 4);
    assert_eq!(validations.load(Ordering::SeqCst), 2);

    let summary = manager.auto_fix_all(&issues, &mut project);
    assert_eq!(fixes.load(Ordering::SeqCst), 2);
    assert_eq!(summary.fix_calls, 2);
    assert_eq!(summary.assumed_fixed, 4);
    assert_eq!(
        summary.fixed_assets,
        ["Assets/A/Flagged.prefab", "Assets/B/Flagged.prefab"]
    );
}

#[test]
fn severity_predicates() {
    let issue = |severity| {
        Issue::new(
            RuleId::new("sample"),
            severity,
            "Assets/a.prefab",
            "msg",
            ObjectRef::new("Assets/a.prefab", "a"),
        )
    };

    assert!(!has_errors(&[]));
    assert!(!has_warnings(&[]));
    assert!(!has_errors(&[issue(Severity::Info)]));
    assert!(!has_warnings(&[issue(Severity::Info)]));
    assert!(has_warnings(&[issue(Severity::Info), issue(Severity::Warning)]));
    assert!(!has_errors(&[issue(Severity::Warning)]));
    assert!(has_errors(&[issue(Severity::Error)]));
    assert!(!has_warnings(&[issue(Severity::Error)]));
}

#[test]
fn missing_settings_fails_the_scan() {
    let mut project = MemoryProject::without_settings();
    let manager = CheckManager::new(&RulesConfig::default(), &project);

    let err = manager
        .run_all_checks(&mut project, &mut NoopObserver)
        .unwrap_err();
    assert!(matches!(err, preflight::PreflightError::SettingsMissing));
}
