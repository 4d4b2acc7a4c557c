//! Animated viewport navigation.

pub mod navigation;

pub use navigation::{
    NavigationBoundsPolicy, NavigationConfig, NavigationStep, ViewportNavigator,
    ease_out_quartic, navigation_target,
};
