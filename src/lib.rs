pub mod answer_evaluator_service;
pub mod answer_matcher;
pub mod card_store;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod database;
pub mod database_factory;
pub mod date_provider;
pub mod distractors;
pub mod error;
pub mod retry_queue;
pub mod row_factories;
pub mod session;
pub mod session_queue;
pub mod session_record;
pub mod spaced_repetition;
pub mod time_format;
