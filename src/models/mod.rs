mod address;
mod credit_card;
mod user;

pub use address::{Address, AddressChanges, NewAddress};
pub use credit_card::{CreditCard, CreditCardChanges, NewCreditCard};
pub use user::{NewUser, User, UserChanges, UserWithRelations};
