pub mod builtins;
pub mod collaborators;
pub mod config;
pub mod contract;
pub mod event_store;
pub mod expression;
pub mod flow;
pub mod grouping;
pub mod logging;
pub mod lookup;
pub mod model;
pub mod palette;
pub mod palette_state;
pub mod prefix;
pub mod ranking;
pub mod registry;
pub mod resolver;
pub mod runtime;
pub mod search;
pub mod transport;
