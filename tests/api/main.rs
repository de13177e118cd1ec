// one test binary for everything under tests/api: linking is sequential, so
// fewer executables means a faster test run
mod contact;
mod helpers;
