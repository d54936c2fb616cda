//! Turn a natural-language request and a discovered schema into prompts for the model,
//! negotiating the schema with the requester first.

pub mod translation;
