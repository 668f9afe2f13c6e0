use std::{
    collections::HashMap,
    sync::{Arc, OnceLock},
};

use crate::models::{
    CategoryLabel, Difficulty, Extent, ResourceDescriptor, ResourceType,
};

/// Static table of learning resources per category
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<CategoryLabel, Vec<ResourceDescriptor>>,
}

impl Catalog {
    pub fn new(entries: HashMap<CategoryLabel, Vec<ResourceDescriptor>>) -> Self {
        Self { entries }
    }

    /// The process-wide reference catalog, built on first use
    pub fn reference() -> Arc<Catalog> {
        static CATALOG: OnceLock<Arc<Catalog>> = OnceLock::new();
        CATALOG
            .get_or_init(|| Arc::new(build_reference_catalog()))
            .clone()
    }

    /// Resources for a category, in catalog order.
    ///
    /// A category without an entry yields an empty slice.
    pub fn resources_for(&self, category: CategoryLabel) -> &[ResourceDescriptor] {
        self.entries
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Categories with at least one entry, in canonical order
    pub fn categories(&self) -> Vec<CategoryLabel> {
        CategoryLabel::ALL
            .into_iter()
            .filter(|label| self.entries.contains_key(label))
            .collect()
    }
}

fn course(title: &'static str, difficulty: Difficulty, duration: &'static str) -> ResourceDescriptor {
    ResourceDescriptor {
        title,
        resource_type: ResourceType::Course,
        difficulty,
        extent: Extent::Duration(duration),
    }
}

fn book(title: &'static str, difficulty: Difficulty, pages: u32) -> ResourceDescriptor {
    ResourceDescriptor {
        title,
        resource_type: ResourceType::Book,
        difficulty,
        extent: Extent::Pages(pages),
    }
}

fn activity(title: &'static str, difficulty: Difficulty, time: &'static str) -> ResourceDescriptor {
    ResourceDescriptor {
        title,
        resource_type: ResourceType::Activity,
        difficulty,
        extent: Extent::TimeRequired(time),
    }
}

fn build_reference_catalog() -> Catalog {
    use CategoryLabel::*;
    use Difficulty::*;

    let entries = HashMap::from([
        (
            MathBasic,
            vec![
                course("Basic Arithmetic Fundamentals", Beginner, "4 weeks"),
                book("Number Sense Workbook", Beginner, 120),
                activity("Math Games for Beginners", Beginner, "30 mins"),
            ],
        ),
        (
            MathIntermediate,
            vec![
                course("Algebra Foundations", Intermediate, "6 weeks"),
                book("Geometry Concepts", Intermediate, 200),
                activity("Problem Solving Strategies", Intermediate, "45 mins"),
            ],
        ),
        (
            MathAdvanced,
            vec![
                course("Advanced Calculus", Advanced, "8 weeks"),
                book("Linear Algebra Concepts", Advanced, 350),
                activity("Math Olympiad Preparation", Advanced, "60 mins"),
            ],
        ),
        (
            ScienceBasic,
            vec![
                course("Introduction to Biology", Beginner, "4 weeks"),
                book("Basic Chemistry Principles", Beginner, 150),
                activity("Simple Science Experiments", Beginner, "30 mins"),
            ],
        ),
        (
            ScienceIntermediate,
            vec![
                course("Chemistry in Daily Life", Intermediate, "6 weeks"),
                book("Physics Fundamentals", Intermediate, 250),
                activity("Intermediate Lab Techniques", Intermediate, "45 mins"),
            ],
        ),
        (
            ScienceAdvanced,
            vec![
                course("Advanced Physics", Advanced, "8 weeks"),
                book("Organic Chemistry", Advanced, 400),
                activity("Research Project Guidance", Advanced, "60 mins"),
            ],
        ),
        (
            LanguageIntermediate,
            vec![
                course("Reading Comprehension", Intermediate, "5 weeks"),
                book("Vocabulary Builder", Intermediate, 180),
                activity("Writing Practice", Intermediate, "40 mins"),
            ],
        ),
        (
            LanguageAdvanced,
            vec![
                course("Advanced Literature", Advanced, "7 weeks"),
                book("Critical Analysis Guide", Advanced, 300),
                activity("Debate and Discussion", Advanced, "50 mins"),
            ],
        ),
        (
            GeneralStudies,
            vec![
                course("Study Skills Mastery", Beginner, "3 weeks"),
                book("Learning Strategies Guide", Beginner, 100),
                activity("Time Management Workshop", Beginner, "30 mins"),
            ],
        ),
    ]);

    Catalog::new(entries)
}
