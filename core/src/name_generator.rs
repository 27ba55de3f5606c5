//! Deterministic borrower, staff and branch names for fixture data.
//!
//! Same RNG stream = same names.

use crate::rng::FixtureRng;

pub struct NameGenerator;

impl NameGenerator {
    pub fn full_name(rng: &mut FixtureRng) -> String {
        let first = rng.pick(Self::first_names());
        let last = rng.pick(Self::last_names());
        format!("{first} {last}")
    }

    /// `firstname.lastname@<domain>`, lowercased.
    pub fn email_for(name: &str, domain: &str) -> String {
        let local = name.to_lowercase().split_whitespace().collect::<Vec<_>>().join(".");
        format!("{local}@{domain}")
    }

    pub fn branch(rng: &mut FixtureRng) -> &'static str {
        *rng.pick(Self::branches())
    }

    pub fn region(rng: &mut FixtureRng) -> &'static str {
        *rng.pick(Self::regions())
    }

    fn first_names() -> &'static [&'static str] {
        &[
            "Rajesh", "Priya", "Amit", "Sneha", "Vikram", "Anjali", "Suresh", "Kavita",
            "Rahul", "Pooja", "Arjun", "Meera", "Sanjay", "Divya", "Karan", "Neha",
            "Manoj", "Lakshmi", "Deepak", "Ritu", "Arun", "Swati", "Imran", "Farah",
            "Gurpreet", "Harleen", "Joseph", "Mary", "Venkat", "Shalini",
        ]
    }

    fn last_names() -> &'static [&'static str] {
        &[
            "Kumar", "Sharma", "Patel", "Singh", "Reddy", "Iyer", "Nair", "Gupta",
            "Mehta", "Joshi", "Khan", "Das", "Rao", "Verma", "Menon", "Pillai",
            "Chatterjee", "Banerjee", "Kulkarni", "Deshmukh", "Thomas", "Gill",
        ]
    }

    fn branches() -> &'static [&'static str] {
        &[
            "Mumbai Central", "Andheri", "Pune Camp", "Bengaluru MG Road", "Chennai T Nagar",
            "Hyderabad Ameerpet", "Delhi Connaught Place", "Kolkata Park Street",
        ]
    }

    fn regions() -> &'static [&'static str] {
        &["North", "South", "East", "West", "Central"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RngBank, ViewSlot};

    #[test]
    fn name_generation_is_deterministic() {
        let mut rng1 = RngBank::new(12345).for_view(ViewSlot::Loans);
        let mut rng2 = RngBank::new(12345).for_view(ViewSlot::Loans);

        assert_eq!(
            NameGenerator::full_name(&mut rng1),
            NameGenerator::full_name(&mut rng2),
            "Same seed should produce same name"
        );
    }

    #[test]
    fn generates_two_part_names() {
        let mut rng = RngBank::new(12345).for_view(ViewSlot::Agents);
        for _ in 0..100 {
            let name = NameGenerator::full_name(&mut rng);
            let parts: Vec<&str> = name.split_whitespace().collect();
            assert_eq!(parts.len(), 2, "Name should have exactly 2 parts: {name}");
        }
    }

    #[test]
    fn email_is_dotted_lowercase() {
        assert_eq!(
            NameGenerator::email_for("Rajesh Kumar", "lendops.in"),
            "rajesh.kumar@lendops.in"
        );
    }
}
