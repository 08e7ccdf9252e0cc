use crate::handlers::{account, admin, bookings, owner, properties};
use crate::models::{
    AuditLogResponse, BookingListResponse, DraftListResponse, ErrorResponse,
    PromotionListResponse, PropertyListResponse, PropertySearchResponse, UserListResponse,
};

use utoipa::OpenApi;

use pgnest_core::chat::{ChatFilters, ChatReply, ChatRequest};
use pgnest_core::models::{
    Amenity, ApprovalStatus, AuditAction, AuditLog, AuditTarget, BlacklistRequest, Booking,
    BookingStatus, BookingStatusUpdate, ChangeRoleRequest, Gender, Location, NewBooking,
    NewPromotionRequest, NewProperty, OwnerPromotionRequest, ProfileUpdate, PromotionReview,
    PromotionStatus, Property, PropertyType, PropertyUpdate, ReviewDecision, Role, SortOrder,
    User,
};
use pgnest_core::services::DashboardStats;
use pgnest_core::wizard::{
    AmenitiesStep, BasicsStep, PhotosStep, PricingStep, PropertyDraft, WizardStep,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        account::get_me,
        account::update_me,
        account::request_promotion,
        account::my_promotion_requests,
        account::chat,
        properties::search_properties,
        properties::get_property,
        properties::create_property,
        properties::update_property,
        properties::delete_property,
        owner::owner_properties,
        owner::owner_bookings,
        owner::list_drafts,
        owner::create_draft,
        owner::get_draft,
        owner::discard_draft,
        owner::submit_step,
        owner::draft_back,
        owner::finish_draft,
        bookings::create_booking,
        bookings::list_bookings,
        bookings::update_booking_status,
        admin::list_users,
        admin::change_role,
        admin::blacklist_user,
        admin::unblacklist_user,
        admin::list_properties,
        admin::review_property,
        admin::list_bookings,
        admin::list_promotion_requests,
        admin::review_promotion_request,
        admin::audit_logs,
        admin::stats
    ),
    components(schemas(
        ErrorResponse,
        User,
        Role,
        ProfileUpdate,
        ChangeRoleRequest,
        BlacklistRequest,
        UserListResponse,
        Property,
        PropertyType,
        Gender,
        Amenity,
        ApprovalStatus,
        Location,
        NewProperty,
        PropertyUpdate,
        SortOrder,
        ReviewDecision,
        PropertySearchResponse,
        PropertyListResponse,
        Booking,
        BookingStatus,
        NewBooking,
        BookingStatusUpdate,
        BookingListResponse,
        OwnerPromotionRequest,
        NewPromotionRequest,
        PromotionReview,
        PromotionStatus,
        PromotionListResponse,
        AuditLog,
        AuditAction,
        AuditTarget,
        AuditLogResponse,
        DashboardStats,
        ChatRequest,
        ChatReply,
        ChatFilters,
        PropertyDraft,
        WizardStep,
        BasicsStep,
        PricingStep,
        AmenitiesStep,
        PhotosStep,
        DraftListResponse
    )),
    tags(
        (name = "pgnest", description = "Student housing marketplace API")
    ),
    servers(
        (url = "/api/v1", description = "Version 1 API"),
    )
)]
pub struct ApiDoc;
