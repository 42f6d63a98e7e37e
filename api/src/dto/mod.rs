pub mod otp;

pub use otp::{
    GenerateOtpRequest, HealthResponse, OtpIssuedResponse, OtpVerifiedResponse, ResendOtpRequest,
    VerifyOtpRequest,
};
