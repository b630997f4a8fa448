// Contrastive lexicon analyzer — which words discriminate two authors.

pub mod zeta;
