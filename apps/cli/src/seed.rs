use serde::{Deserialize, Serialize};

pub const COLLECTION: &str = "users";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    pub name: String,
    pub age: u32,
    pub contact: String,
    pub company: String,
    pub address: Address,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct Address {
    pub city: String,
    pub state: String,
    pub country: String,
    pub pin_code: u32,
}

impl User {
    fn new(
        name: &str,
        age: u32,
        contact: &str,
        company: &str,
        (city, state, pin_code): (&str, &str, u32),
    ) -> Self {
        Self {
            name: name.to_owned(),
            age,
            contact: contact.to_owned(),
            company: company.to_owned(),
            address: Address {
                city: city.to_owned(),
                state: state.to_owned(),
                country: "USA".to_owned(),
                pin_code,
            },
        }
    }
}

/// Sample employees, paired with their record keys (`<position>_<name>`).
pub fn employees() -> Vec<(String, User)> {
    [
        User::new("john", 25, "1234567890", "ABC Inc", ("New York", "NY", 10001)),
        User::new("jane", 30, "0987654321", "XYZ Corp", ("Los Angeles", "CA", 90001)),
        User::new("jim", 35, "1111111111", "DEF Inc", ("Chicago", "IL", 60601)),
        User::new("jill", 40, "2222222222", "GHI Corp", ("Houston", "TX", 77001)),
        User::new("jack", 45, "3333333333", "JKL Inc", ("Miami", "FL", 33101)),
        User::new("jane", 50, "4444444444", "MNO Corp", ("Seattle", "WA", 98101)),
        User::new("jim", 55, "5555555555", "PQR Inc", ("San Francisco", "CA", 94101)),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, user)| (format!("{}_{}", i + 1, user.name), user))
    .collect()
}
