//! # Built-in Feature Catalog
//!
//! Descriptors for the features shipped with Terrarium, with enablement
//! resolved from `FeatureFlags`.
//!
//! Feature names are constants shared with whoever binds dashboard
//! providers, so a provider is always keyed by the exact name its
//! descriptor was registered under.

use crate::flags::FeatureFlags;
use crate::{FeatureDescriptor, GuardId, NavigationEntry, RouteDefinition};

/// Animal records, care logs and enclosures.
pub const REPTILE_MANAGEMENT: &str = "reptile-management";
/// Administration of user accounts.
pub const USER_MANAGEMENT: &str = "user-management";
/// Personal todo lists.
pub const TODOS: &str = "todos";

/// Every built-in feature name, in registration order.
pub const BUILTIN_FEATURES: [&str; 3] = [REPTILE_MANAGEMENT, USER_MANAGEMENT, TODOS];

/// Tag carried by the user-management navigation entry.
const USER_MANAGEMENT_TAG: &str = "userManagement";

// SVG path data rendered verbatim by the view layer.
pub const REPTILE_ICON: &str = "M14.828 14.828a4 4 0 01-5.656 0M9 10h1.586a1 1 0 01.707.293l.707.707A1 1 0 0012.414 11H13m-3 3.5A2.5 2.5 0 1110.5 16v-1.5a1 1 0 10-2 0v1.5z";
pub const FEEDING_ICON: &str =
    "M12 9v3m0 0v3m0-3h3m-3 0H9m12 0a9 9 0 11-18 0 9 9 0 0118 0z";
pub const CLEANING_ICON: &str = "M19 7l-.867 12.142A2 2 0 0116.138 21H7.862a2 2 0 01-1.995-1.858L5 7m5 4v6m4-6v6m1-10V4a1 1 0 00-1-1h-4a1 1 0 00-1 1v3M4 7h16";
const USERS_ICON: &str = "M12 4.354a4 4 0 110 5.292M15 21H3v-1a6 6 0 0112 0v1zm0 0h6v-1a6 6 0 00-9-5.197M13 7a4 4 0 11-8 0 4 4 0 018 0z";
const TODOS_ICON: &str = "M9 5H7a2 2 0 00-2 2v12a2 2 0 002 2h10a2 2 0 002-2V7a2 2 0 00-2-2h-2M9 5a2 2 0 002 2h2a2 2 0 002-2M9 5a2 2 0 012-2h2a2 2 0 012 2m-6 9l2 2 4-4";

/// Default enablement when a flag is not configured.
#[must_use]
pub fn default_enabled(name: &str) -> bool {
    match name {
        REPTILE_MANAGEMENT | USER_MANAGEMENT => true,
        _ => false,
    }
}

/// Descriptors for all built-in features, in registration order.
#[must_use]
pub fn builtin_features(flags: &FeatureFlags) -> Vec<FeatureDescriptor> {
    for name in flags.unknown(&BUILTIN_FEATURES) {
        tracing::warn!(flag = name, "Unknown feature flag ignored");
    }

    vec![
        reptile_management(enabled(flags, REPTILE_MANAGEMENT)),
        user_management(enabled(flags, USER_MANAGEMENT)),
        todos(enabled(flags, TODOS)),
    ]
}

fn enabled(flags: &FeatureFlags, name: &str) -> bool {
    flags.resolve(name, default_enabled(name))
}

fn reptile_management(enabled: bool) -> FeatureDescriptor {
    FeatureDescriptor::new(REPTILE_MANAGEMENT, enabled)
        .with_route(RouteDefinition::new("reptiles", "reptile-list").guarded_by(GuardId::authenticated()))
        .with_route(
            RouteDefinition::new("reptiles/add", "add-reptile").guarded_by(GuardId::authenticated()),
        )
        .with_route(
            RouteDefinition::new("reptiles/:id", "reptile-detail")
                .guarded_by(GuardId::authenticated()),
        )
}

fn user_management(enabled: bool) -> FeatureDescriptor {
    FeatureDescriptor::new(USER_MANAGEMENT, enabled)
        .with_route(
            RouteDefinition::new("admin/users", "user-management")
                .guarded_by(GuardId::authenticated())
                .guarded_by(GuardId::admin()),
        )
        .with_navigation(
            NavigationEntry::new("User Management", "/admin/users", USERS_ICON)
                .admin_only()
                .owned_by(USER_MANAGEMENT_TAG),
        )
}

fn todos(enabled: bool) -> FeatureDescriptor {
    FeatureDescriptor::new(TODOS, enabled)
        .with_route(RouteDefinition::new("todos", "todo-list").guarded_by(GuardId::authenticated()))
        .with_navigation(NavigationEntry::new("Todos", "/todos", TODOS_ICON).owned_by(TODOS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FeatureRegistry;

    #[test]
    fn defaults_match_shipping_configuration() {
        let registry = FeatureRegistry::from_descriptors(builtin_features(&FeatureFlags::new()));
        assert!(registry.is_enabled(REPTILE_MANAGEMENT));
        assert!(registry.is_enabled(USER_MANAGEMENT));
        assert!(!registry.is_enabled(TODOS));

        let paths: Vec<_> = registry.enabled_routes().into_iter().map(|r| r.path).collect();
        assert_eq!(
            paths,
            vec!["reptiles", "reptiles/add", "reptiles/:id", "admin/users"]
        );
    }

    #[test]
    fn flags_toggle_features() {
        let flags = FeatureFlags::new()
            .with(TODOS, true)
            .with(USER_MANAGEMENT, false);
        let registry = FeatureRegistry::from_descriptors(builtin_features(&flags));

        let labels: Vec<_> = registry
            .enabled_navigation()
            .into_iter()
            .map(|n| n.label)
            .collect();
        assert_eq!(labels, vec!["Todos"]);
    }

    #[test]
    fn admin_route_requires_both_guards() {
        let registry = FeatureRegistry::from_descriptors(builtin_features(&FeatureFlags::new()));
        let routes = registry.routes_for(USER_MANAGEMENT);
        assert_eq!(routes.len(), 1);
        assert_eq!(
            routes[0].guards,
            vec![GuardId::authenticated(), GuardId::admin()]
        );
    }

    #[test]
    fn admin_navigation_sorts_after_todos() {
        let flags = FeatureFlags::new().with(TODOS, true);
        let registry = FeatureRegistry::from_descriptors(builtin_features(&flags));
        let labels: Vec<_> = registry
            .enabled_navigation()
            .into_iter()
            .map(|n| n.label)
            .collect();
        assert_eq!(labels, vec!["Todos", "User Management"]);
    }
}
