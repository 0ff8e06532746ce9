mod capture;
mod session;
