use crate::model::*;
use crate::sigshow::Sigshow;
pub mod builtin;

pub trait Rule {
    fn code(&self) -> &'static str;
    fn name(&self) -> &'static str;
    fn run(&self, k: &Sigshow) -> Vec<Finding>;
}

pub struct RuleRunner<'k> {
    k: &'k Sigshow,
    rules: Vec<Box<dyn Rule>>,
}

impl<'k> RuleRunner<'k> {
    pub fn new(k: &'k Sigshow) -> Self {
        Self { k, rules: Vec::new() }
    }

    pub fn with_default_rules(mut self) -> Self {
        self.rules.push(Box::new(builtin::UnannotatedArgument));
        self.rules.push(Box::new(builtin::MissingReturnAnnotation));
        self.rules.push(Box::new(builtin::ShadowedDefinition));
        self
    }

    pub fn add_rule<R: Rule + 'static>(mut self, r: R) -> Self {
        self.rules.push(Box::new(r));
        self
    }

    pub fn run(self) -> Vec<Finding> {
        let mut all = Vec::new();
        for r in self.rules {
            let found = r.run(self.k);
            tracing::debug!(code = r.code(), rule = r.name(), findings = found.len(), "rule finished");
            all.extend(found);
        }
        all
    }
}
