//! Mock data used to populate repositories at startup.

use std::collections::HashSet;

use chrono::{Days, NaiveDate};
use rand::Rng;
use uuid::Builder;

use crate::entities::{Agent, AgentDraft, Case, CaseDraft};
use crate::enums::{AgentRole, CaseStatus};
use crate::identity::EntityIdType;

const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "John", "Patricia", "Robert", "Jennifer", "Michael", "Linda", "William",
    "Elizabeth", "David", "Barbara", "Richard", "Susan", "Joseph", "Jessica", "Thomas", "Sarah",
    "Christopher", "Karen", "Charles", "Nancy", "Daniel", "Lisa", "Matthew", "Betty", "Anthony",
    "Helen", "Mark", "Sandra", "Donald", "Donna", "Steven", "Carol", "Paul", "Ruth", "Andrew",
    "Sharon", "Joshua", "Michelle", "Kenneth", "Laura", "Kevin", "Brian", "Kimberly", "George",
    "Deborah", "Edward", "Dorothy", "Ronald", "Amy", "Timothy", "Angela", "Jason", "Ashley",
    "Jeffrey", "Brenda", "Ryan", "Emma", "Jacob", "Olivia", "Gary", "Cynthia", "Nicholas",
    "Marie", "Eric", "Janet", "Jonathan", "Catherine", "Stephen", "Frances", "Larry",
    "Christine", "Justin", "Samantha", "Scott", "Debra", "Brandon", "Rachel", "Benjamin",
    "Carolyn", "Samuel", "Gregory", "Virginia", "Alexander", "Maria", "Frank", "Heather",
    "Raymond", "Diane", "Jack", "Julie", "Dennis", "Joyce", "Jerry", "Victoria", "Tyler",
    "Kelly", "Aaron", "Christina", "Jose", "Joan", "Henry", "Evelyn", "Adam", "Lauren",
    "Douglas", "Judith", "Nathan", "Megan", "Peter", "Cheryl", "Zachary", "Andrea", "Kyle",
    "Hannah", "Walter", "Jacqueline", "Harold", "Martha", "Carl", "Gloria", "Jeremy", "Teresa",
    "Arthur", "Sara",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas", "Taylor",
    "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson", "White", "Harris", "Sanchez",
    "Clark", "Ramirez", "Lewis", "Robinson", "Walker", "Young", "Allen", "King", "Wright",
    "Scott", "Torres", "Nguyen", "Hill", "Flores", "Green", "Adams", "Nelson", "Baker", "Hall",
    "Rivera", "Campbell", "Mitchell", "Carter", "Roberts", "Gomez", "Phillips", "Evans",
    "Turner", "Diaz", "Parker", "Cruz", "Edwards", "Collins", "Reyes", "Stewart", "Morris",
    "Morales", "Murphy", "Cook", "Rogers", "Gutierrez", "Ortiz", "Morgan", "Cooper", "Peterson",
    "Bailey", "Reed", "Kelly", "Howard", "Ramos", "Kim", "Cox", "Ward", "Richardson", "Watson",
    "Brooks", "Chavez", "Wood", "James", "Bennett", "Gray", "Mendoza", "Ruiz", "Hughes", "Price",
    "Alvarez", "Castillo", "Sanders", "Patel", "Myers", "Long", "Ross", "Foster", "Jimenez",
    "Powell", "Jenkins", "Perry", "Russell", "Sullivan", "Bell", "Coleman", "Butler",
    "Henderson", "Barnes", "Gonzales", "Fisher", "Vasquez", "Simmons", "Romero", "Jordan",
    "Patterson", "Alexander", "Hamilton", "Graham",
];

/// Cumulative role weights: Officer 0.6, Detective 0.3, Captain 0.08, Chief 0.02.
const ROLE_WEIGHTS: [(AgentRole, f64); 4] = [
    (AgentRole::Officer, 0.6),
    (AgentRole::Detective, 0.3),
    (AgentRole::Captain, 0.08),
    (AgentRole::Chief, 0.02),
];

const CASE_TEMPLATES: &[(&str, &str)] = &[
    (
        "Homicide",
        "Shots were reported at 22:33 in the Union district, resulting in the death of a 45 year old man.",
    ),
    ("Car accident", "Two vehicles collided at the Main Street intersection during rush hour."),
    (
        "Burglary Investigation",
        "Break-in reported at 123 Main Street. Electronics and jewelry were taken.",
    ),
    ("Stolen vehicle", "A blue sedan was taken from a residential driveway overnight."),
    ("Vandalism", "Graffiti and broken windows reported at the community center."),
    ("Missing person", "A 17 year old has not been seen since leaving school on Friday."),
    ("Fraud", "Several residents reported forged cheques drawn on their accounts."),
    ("Armed robbery", "A convenience store clerk was threatened at gunpoint shortly after midnight."),
    ("Assault", "A bar fight left one patron hospitalised with head injuries."),
    ("Arson", "A warehouse fire was found to have started in three separate places."),
];

const INCORPORATION_START: NaiveDate = match NaiveDate::from_ymd_opt(2007, 1, 1) {
    Some(date) => date,
    None => panic!("invalid seed start date"),
};

const INCORPORATION_END: NaiveDate = match NaiveDate::from_ymd_opt(2024, 12, 31) {
    Some(date) => date,
    None => panic!("invalid seed end date"),
};

/// Share of seeded cases that are still open.
const OPEN_RATIO: f64 = 0.7;

/// Timestamp range for seeded v7 ids: 2024-01-01 .. 2025-01-01 UTC, in ms.
const ID_EPOCH_MS: u64 = 1_704_067_200_000;
const ID_SPAN_MS: u64 = 366 * 24 * 60 * 60 * 1000;

/// A v7 id whose timestamp and random bits all come from `rng`.
fn random_id<T: EntityIdType>(rng: &mut impl Rng) -> T {
    let millis = rng.random_range(ID_EPOCH_MS..ID_EPOCH_MS + ID_SPAN_MS);
    let random_bytes: [u8; 10] = rng.random();
    T::new(Builder::from_unix_timestamp_millis(millis, &random_bytes).into_uuid())
}

fn random_role(rng: &mut impl Rng) -> AgentRole {
    let roll: f64 = rng.random();
    let mut cumulative = 0.0;
    for (role, weight) in ROLE_WEIGHTS {
        cumulative += weight;
        if roll <= cumulative {
            return role;
        }
    }
    AgentRole::Officer
}

fn random_incorporation_date(rng: &mut impl Rng) -> NaiveDate {
    let span = (INCORPORATION_END - INCORPORATION_START).num_days() as u64;
    let offset = rng.random_range(0..=span);
    INCORPORATION_START
        .checked_add_days(Days::new(offset))
        .unwrap_or(INCORPORATION_END)
}

fn random_name(rng: &mut impl Rng) -> String {
    let first = FIRST_NAMES[rng.random_range(0..FIRST_NAMES.len())];
    let last = LAST_NAMES[rng.random_range(0..LAST_NAMES.len())];
    format!("{} {}", first, last)
}

/// Generate `count` agents with distinct names while the name space allows it.
pub fn generate_agents(count: usize, rng: &mut impl Rng) -> Vec<Agent> {
    let name_space = FIRST_NAMES.len() * LAST_NAMES.len();
    let mut used = HashSet::with_capacity(count.min(name_space));
    let mut agents = Vec::with_capacity(count);

    for _ in 0..count {
        let mut name = random_name(rng);
        if used.len() < name_space {
            while used.contains(&name) {
                name = random_name(rng);
            }
            used.insert(name.clone());
        }

        let draft = AgentDraft {
            name,
            role: random_role(rng),
            incorporation_date: random_incorporation_date(rng),
        };
        agents.push(draft.into_agent(random_id(rng)));
    }

    agents
}

/// Generate `count` cases, each assigned to one of `agents`.
///
/// Returns no cases when `agents` is empty.
pub fn generate_cases(count: usize, agents: &[Agent], rng: &mut impl Rng) -> Vec<Case> {
    if agents.is_empty() {
        return Vec::new();
    }

    (0..count)
        .map(|_| {
            let (title, description) = CASE_TEMPLATES[rng.random_range(0..CASE_TEMPLATES.len())];
            let agent = &agents[rng.random_range(0..agents.len())];
            let status = if rng.random_bool(OPEN_RATIO) {
                CaseStatus::Open
            } else {
                CaseStatus::Solved
            };
            CaseDraft {
                title: title.to_string(),
                description: description.to_string(),
                status,
                agent_id: agent.id,
            }
            .into_case(random_id(rng))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::AgentId;
    use crate::validation::agent::{validate_create_agent, AgentPayload};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_agents_have_unique_names() {
        let mut rng = StdRng::seed_from_u64(7);
        let agents = generate_agents(500, &mut rng);
        assert_eq!(agents.len(), 500);

        let names: HashSet<_> = agents.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names.len(), 500);
    }

    #[test]
    fn test_agents_are_valid() {
        let mut rng = StdRng::seed_from_u64(11);
        for agent in generate_agents(50, &mut rng) {
            assert!(agent.incorporation_date >= INCORPORATION_START);
            assert!(agent.incorporation_date <= INCORPORATION_END);

            let payload: AgentPayload = serde_json::from_value(serde_json::json!({
                "name": agent.name,
                "role": agent.role,
                "incorporationDate": agent.incorporation_date.format("%Y/%m/%d").to_string(),
            }))
            .unwrap();
            assert!(validate_create_agent(&payload).is_empty());
        }
    }

    #[test]
    fn test_cases_reference_seeded_agents() {
        let mut rng = StdRng::seed_from_u64(3);
        let agents = generate_agents(10, &mut rng);
        let cases = generate_cases(25, &agents, &mut rng);
        assert_eq!(cases.len(), 25);
        assert!(cases
            .iter()
            .all(|case| agents.iter().any(|agent| agent.id == case.agent_id)));
    }

    #[test]
    fn test_same_seed_same_ids() {
        let generate = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let agents = generate_agents(20, &mut rng);
            let cases = generate_cases(5, &agents, &mut rng);
            (
                agents.iter().map(|a| a.id).collect::<Vec<_>>(),
                cases.iter().map(|c| c.id).collect::<Vec<_>>(),
            )
        };
        assert_eq!(generate(9), generate(9));
        assert_ne!(generate(9), generate(10));
    }

    #[test]
    fn test_seeded_ids_are_canonical_v7() {
        let mut rng = StdRng::seed_from_u64(5);
        for agent in generate_agents(20, &mut rng) {
            assert_eq!(agent.id.as_uuid().get_version_num(), 7);
            assert_eq!(AgentId::parse(&agent.id.to_string()), Some(agent.id));
        }
    }

    #[test]
    fn test_no_agents_no_cases() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(generate_cases(25, &[], &mut rng).is_empty());
    }

    #[test]
    fn test_role_distribution_favours_officers() {
        let mut rng = StdRng::seed_from_u64(42);
        let agents = generate_agents(2000, &mut rng);
        let officers = agents.iter().filter(|a| a.role == AgentRole::Officer).count();
        let chiefs = agents.iter().filter(|a| a.role == AgentRole::Chief).count();
        assert!(officers > 1000);
        assert!(chiefs < 150);
    }
}
