//! Role-specific theme helpers for consistent styling across pages.
//!
//! Class names resolve against `assets/main.css`; the seller surface is
//! accented in sky blue, the admin surface in amber.

use crate::domain::Role;

/// Outermost container; sets the accent variables for everything inside.
pub fn surface_class(role: Role) -> &'static str {
    match role {
        Role::Seller => "pd-app pd-seller",
        Role::Admin => "pd-app pd-admin",
    }
}

// ============================================
// BUTTON STYLES
// ============================================

pub fn btn_primary(role: Role) -> &'static str {
    match role {
        Role::Seller => "pd-btn pd-btn-primary pd-seller",
        Role::Admin => "pd-btn pd-btn-primary pd-admin",
    }
}

pub fn btn_secondary(role: Role) -> &'static str {
    match role {
        Role::Seller => "pd-btn pd-btn-secondary pd-seller",
        Role::Admin => "pd-btn pd-btn-secondary pd-admin",
    }
}

pub fn btn_nav(role: Role, active: bool) -> &'static str {
    match (role, active) {
        (Role::Seller, true) => "pd-nav pd-nav-active pd-seller",
        (Role::Admin, true) => "pd-nav pd-nav-active pd-admin",
        (Role::Seller, false) => "pd-nav pd-seller",
        (Role::Admin, false) => "pd-nav pd-admin",
    }
}

pub fn btn_danger() -> &'static str {
    "pd-btn pd-btn-danger"
}

// ============================================
// INPUT STYLES
// ============================================

pub fn input_class(role: Role) -> &'static str {
    match role {
        Role::Seller => "pd-input pd-seller",
        Role::Admin => "pd-input pd-admin",
    }
}

pub fn input_error() -> &'static str {
    "pd-input pd-input-error"
}

pub fn label_class(role: Role) -> &'static str {
    match role {
        Role::Seller => "pd-label pd-seller",
        Role::Admin => "pd-label pd-admin",
    }
}

// ============================================
// PANEL / TABLE STYLES
// ============================================

pub fn panel_border(role: Role) -> &'static str {
    match role {
        Role::Seller => "pd-panel pd-seller",
        Role::Admin => "pd-panel pd-admin",
    }
}

pub fn table_container(role: Role) -> &'static str {
    match role {
        Role::Seller => "pd-table-wrap pd-seller",
        Role::Admin => "pd-table-wrap pd-admin",
    }
}

pub fn table_header(role: Role) -> &'static str {
    match role {
        Role::Seller => "pd-table-head pd-seller",
        Role::Admin => "pd-table-head pd-admin",
    }
}

// ============================================
// TEXT STYLES
// ============================================

pub fn title_class(role: Role) -> &'static str {
    match role {
        Role::Seller => "pd-title pd-seller",
        Role::Admin => "pd-title pd-admin",
    }
}

pub fn accent_text(role: Role) -> &'static str {
    match role {
        Role::Seller => "pd-accent pd-seller",
        Role::Admin => "pd-accent pd-admin",
    }
}

pub fn text_muted() -> &'static str {
    "pd-muted"
}

pub fn text_warning() -> &'static str {
    "pd-warning"
}
