mod helpers;
mod send_otp_test;
