/// Fixed project classification
///
/// Categories and subcategories are a closed set. Labels are what the database
/// and JSON carry; slugs are derived from labels for routing.

use crate::content::slug::slugify;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Architectural Visualization")]
    ArchitecturalVisualization,
    #[serde(rename = "Product Visualization")]
    ProductVisualization,
    #[serde(rename = "Real Estate Marketing")]
    RealEstateMarketing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subcategory {
    #[serde(rename = "Exterior Renderings")]
    ExteriorRenderings,
    #[serde(rename = "Interior Renderings")]
    InteriorRenderings,
    #[serde(rename = "Aerial Views")]
    AerialViews,
    #[serde(rename = "3D Animations")]
    ThreeDAnimations,
    #[serde(rename = "Product Renderings")]
    ProductRenderings,
    #[serde(rename = "Packaging Design")]
    PackagingDesign,
    #[serde(rename = "Product Animations")]
    ProductAnimations,
    #[serde(rename = "Virtual Tours")]
    VirtualTours,
    #[serde(rename = "Floor Plans")]
    FloorPlans,
    #[serde(rename = "Marketing Materials")]
    MarketingMaterials,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::ArchitecturalVisualization,
        Category::ProductVisualization,
        Category::RealEstateMarketing,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::ArchitecturalVisualization => "Architectural Visualization",
            Category::ProductVisualization => "Product Visualization",
            Category::RealEstateMarketing => "Real Estate Marketing",
        }
    }

    pub fn slug(self) -> String {
        slugify(self.label())
    }

    pub fn subcategories(self) -> Vec<Subcategory> {
        Subcategory::ALL
            .into_iter()
            .filter(|sub| sub.category() == self)
            .collect()
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.slug() == slug)
    }
}

impl Subcategory {
    pub const ALL: [Subcategory; 10] = [
        Subcategory::ExteriorRenderings,
        Subcategory::InteriorRenderings,
        Subcategory::AerialViews,
        Subcategory::ThreeDAnimations,
        Subcategory::ProductRenderings,
        Subcategory::PackagingDesign,
        Subcategory::ProductAnimations,
        Subcategory::VirtualTours,
        Subcategory::FloorPlans,
        Subcategory::MarketingMaterials,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Subcategory::ExteriorRenderings => "Exterior Renderings",
            Subcategory::InteriorRenderings => "Interior Renderings",
            Subcategory::AerialViews => "Aerial Views",
            Subcategory::ThreeDAnimations => "3D Animations",
            Subcategory::ProductRenderings => "Product Renderings",
            Subcategory::PackagingDesign => "Packaging Design",
            Subcategory::ProductAnimations => "Product Animations",
            Subcategory::VirtualTours => "Virtual Tours",
            Subcategory::FloorPlans => "Floor Plans",
            Subcategory::MarketingMaterials => "Marketing Materials",
        }
    }

    /// The parent category; every subcategory has exactly one
    pub fn category(self) -> Category {
        match self {
            Subcategory::ExteriorRenderings
            | Subcategory::InteriorRenderings
            | Subcategory::AerialViews
            | Subcategory::ThreeDAnimations => Category::ArchitecturalVisualization,
            Subcategory::ProductRenderings
            | Subcategory::PackagingDesign
            | Subcategory::ProductAnimations => Category::ProductVisualization,
            Subcategory::VirtualTours
            | Subcategory::FloorPlans
            | Subcategory::MarketingMaterials => Category::RealEstateMarketing,
        }
    }

    pub fn slug(self) -> String {
        slugify(self.label())
    }

    /// Resolve a subcategory slug within a category
    pub fn from_slug(category: Category, slug: &str) -> Option<Self> {
        category.subcategories().into_iter().find(|s| s.slug() == slug)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Subcategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Accepts either the label or the slug
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s) || c.slug() == s)
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

impl FromStr for Subcategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s) || c.slug() == s)
            .ok_or_else(|| format!("Unknown subcategory: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_has_subcategories() {
        for category in Category::ALL {
            assert!(!category.subcategories().is_empty(), "{} is empty", category);
        }
        let total: usize = Category::ALL.iter().map(|c| c.subcategories().len()).sum();
        assert_eq!(total, Subcategory::ALL.len());
    }

    #[test]
    fn slugs_round_trip_through_lookup() {
        for sub in Subcategory::ALL {
            assert_eq!(Subcategory::from_slug(sub.category(), &sub.slug()), Some(sub));
        }
        assert_eq!(
            Category::from_slug("real-estate-marketing"),
            Some(Category::RealEstateMarketing)
        );
        assert_eq!(Category::from_slug("unknown"), None);
    }

    #[test]
    fn subcategory_lookup_is_scoped_to_its_category() {
        assert_eq!(
            Subcategory::from_slug(Category::ProductVisualization, "floor-plans"),
            None
        );
    }

    #[test]
    fn parses_labels_and_serializes_as_labels() {
        assert_eq!("Aerial Views".parse::<Subcategory>(), Ok(Subcategory::AerialViews));
        assert!("Sculpture".parse::<Category>().is_err());
        assert_eq!(
            serde_json::to_string(&Subcategory::ThreeDAnimations).unwrap(),
            "\"3D Animations\""
        );
    }
}
