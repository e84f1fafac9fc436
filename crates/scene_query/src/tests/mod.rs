//! Scenario and property tests that exercise the whole query pipeline

mod scene_queries;
