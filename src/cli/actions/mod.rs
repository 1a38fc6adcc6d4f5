pub mod signout;
pub mod signup;
pub mod whoami;

use secrecy::SecretString;

#[derive(Debug)]
pub enum Action {
    Whoami,
    Signup {
        email: String,
        password: SecretString,
    },
    Signout,
}
